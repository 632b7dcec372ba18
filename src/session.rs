use crate::domain::Tuple;
use crate::ingestion::{
    extract_tuples, parse_import_document, CompletionClient, IngestionOutcome,
    IngestionPipeline, PromptTemplate,
};
use crate::memory::{
    export_string, ExportWriter, GraphAction, GraphState, GraphStore, TupleFileReader,
};
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Growth of the state caused by one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub tuples: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
}

/// One in-memory graph session: the control point every action is dispatched from.
///
/// Operations take `&mut self`, so at most one completion fetch can be in flight.
pub struct Session {
    store: GraphStore,
    pipeline: Option<IngestionPipeline<dyn CompletionClient>>,
}

impl Session {
    /// A session that can import and ingest text but has no model to generate from.
    pub fn new() -> Self {
        Self {
            store: GraphStore::new(),
            pipeline: None,
        }
    }

    pub fn with_client<C: CompletionClient + 'static>(
        client: Arc<C>,
        template: PromptTemplate,
    ) -> Self {
        let client: Arc<dyn CompletionClient> = client;
        Self {
            store: GraphStore::new(),
            pipeline: Some(IngestionPipeline::new(client, template)),
        }
    }

    pub fn snapshot(&self) -> &GraphState {
        self.store.state()
    }

    /// Fetches a completion for `prompt` and merges it. On failure nothing is dispatched.
    pub fn generate(&mut self, prompt: &str) -> Result<MergeSummary> {
        let Some(pipeline) = &self.pipeline else {
            bail!("no completion client configured for this session");
        };
        let outcome = pipeline.generate(prompt)?;
        Ok(self.apply(outcome))
    }

    /// Merges tuples extracted from completion text obtained elsewhere.
    pub fn ingest_text(&mut self, text: &str) -> MergeSummary {
        self.apply(IngestionOutcome::from_tuples(extract_tuples(text)))
    }

    pub fn ingest_tuples(&mut self, tuples: Vec<Tuple>) -> MergeSummary {
        self.apply(IngestionOutcome::from_tuples(tuples))
    }

    /// Merges an import document given as text; invalid documents merge nothing.
    pub fn import_str(&mut self, text: &str) -> MergeSummary {
        self.apply(IngestionOutcome::from_tuples(parse_import_document(text)))
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<MergeSummary> {
        let tuples = TupleFileReader::load_from_path(path)?;
        Ok(self.apply(IngestionOutcome::from_tuples(tuples)))
    }

    pub fn export_string(&self) -> String {
        export_string(self.store.state())
    }

    /// Writes the export document and returns the number of exported edges.
    /// An empty graph is refused unless `allow_empty` is set.
    pub fn export_file(&self, path: impl AsRef<Path>, allow_empty: bool) -> Result<usize> {
        let state = self.store.state();
        if state.edges().is_empty() && !allow_empty {
            bail!("the graph has no edges to export");
        }
        ExportWriter::save_to_path(path.as_ref(), state)?;
        info!(path = %path.as_ref().display(), edges = state.edges().len(), "graph exported");
        Ok(state.edges().len())
    }

    pub fn clear(&mut self) {
        self.store.dispatch(GraphAction::ClearGraph);
    }

    fn apply(&mut self, outcome: IngestionOutcome) -> MergeSummary {
        let nodes_before = self.store.state().nodes().len();
        let edges_before = self.store.state().edges().len();
        let state = self
            .store
            .dispatch(GraphAction::AddNodesAndEdges(outcome.delta));
        MergeSummary {
            tuples: outcome.tuples.len(),
            nodes_added: state.nodes().len() - nodes_before,
            edges_added: state.edges().len() - edges_before,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
