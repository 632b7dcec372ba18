use super::export::export_string;
use super::state::GraphState;
use crate::domain::Tuple;
use crate::ingestion::parse_import_document;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub struct TupleFileReader;

impl TupleFileReader {
    /// Reads an import file. Unreadable files are errors; malformed content yields no tuples.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<Tuple>> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read import file {:?}", path))?;
        Ok(parse_import_document(&data))
    }
}

pub struct ExportWriter;

impl ExportWriter {
    pub fn save_to_path(path: impl AsRef<Path>, state: &GraphState) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {:?}", parent))?;
        }
        fs::write(path, export_string(state))
            .with_context(|| format!("failed to write export to {:?}", path))?;
        Ok(())
    }

    pub fn default_file_name(now: DateTime<Utc>) -> String {
        format!("knowledge-graph-{}.json", now.format("%Y%m%dT%H%M%SZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::delta_from_tuples;
    use crate::memory::{reduce, GraphAction};
    use chrono::TimeZone;

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graph.json");
        let tuples = vec![Tuple::new("a", "r", "b")];
        let state = reduce(
            GraphState::empty(),
            GraphAction::AddNodesAndEdges(delta_from_tuples(&tuples)),
        );

        ExportWriter::save_to_path(&path, &state).unwrap();
        assert_eq!(TupleFileReader::load_from_path(&path).unwrap(), tuples);
    }

    #[test]
    fn malformed_file_yields_no_tuples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ definitely not json").unwrap();
        assert!(TupleFileReader::load_from_path(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TupleFileReader::load_from_path(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn default_name_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            ExportWriter::default_file_name(now),
            "knowledge-graph-20240309T140507Z.json"
        );
    }
}
