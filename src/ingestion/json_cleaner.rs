use crate::domain::Tuple;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Normalizes an imported JSON document into tuples.
///
/// `None` stands for "no document" (the file did not parse). Only a top-level array is
/// accepted; its elements may be `{subject, predicate, object}` objects, the shape written
/// by the exporter, or three-string arrays. Elements that do not fit are skipped.
pub fn clean_json_tuples(value: Option<&Value>) -> Vec<Tuple> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(kind = json_kind(other), "import document is not an array; ignoring it");
            return Vec::new();
        }
        None => {
            warn!("no import document to clean");
            return Vec::new();
        }
    };

    let tuples: Vec<Tuple> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let tuple = tuple_from_element(item);
            if tuple.is_none() {
                debug!(index, "skipping malformed import element");
            }
            tuple
        })
        .collect();
    debug!(elements = items.len(), tuples = tuples.len(), "import document cleaned");
    tuples
}

/// Parses raw import text. Invalid JSON is treated like a missing document.
pub fn parse_import_document(text: &str) -> Vec<Tuple> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => clean_json_tuples(Some(&value)),
        Err(err) => {
            warn!(error = %err, "import document is not valid JSON");
            clean_json_tuples(None)
        }
    }
}

fn tuple_from_element(item: &Value) -> Option<Tuple> {
    match item {
        Value::Object(fields) => Tuple::from_fields(
            string_field(fields, "subject")?,
            string_field(fields, "predicate")?,
            string_field(fields, "object")?,
        ),
        Value::Array(parts) => match parts.as_slice() {
            [subject, predicate, object] => {
                Tuple::from_fields(subject.as_str()?, predicate.as_str()?, object.as_str()?)
            }
            _ => None,
        },
        _ => None,
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_exported_shape() {
        let doc = json!([
            {"subject": "Paris", "predicate": "capitalOf", "object": "France"},
            {"subject": "Paris", "predicate": "locatedIn", "object": "Europe", "note": "extra"}
        ]);
        assert_eq!(
            clean_json_tuples(Some(&doc)),
            vec![
                Tuple::new("Paris", "capitalOf", "France"),
                Tuple::new("Paris", "locatedIn", "Europe"),
            ]
        );
    }

    #[test]
    fn accepts_three_string_arrays() {
        let doc = json!([["a", "b", "c"], ["a", "b"], ["a", 1, "c"]]);
        assert_eq!(clean_json_tuples(Some(&doc)), vec![Tuple::new("a", "b", "c")]);
    }

    #[test]
    fn skips_incomplete_elements() {
        let doc = json!([
            {"subject": "a", "predicate": "b"},
            {"subject": "a", "predicate": "b", "object": 3},
            {"subject": " ", "predicate": "b", "object": "c"},
            null,
            "text",
            {"subject": " x ", "predicate": "y", "object": "z "}
        ]);
        assert_eq!(clean_json_tuples(Some(&doc)), vec![Tuple::new("x", "y", "z")]);
    }

    #[test]
    fn non_array_documents_are_empty() {
        assert!(clean_json_tuples(None).is_empty());
        assert!(clean_json_tuples(Some(&Value::Null)).is_empty());
        let single = json!({"subject": "a", "predicate": "b", "object": "c"});
        assert!(clean_json_tuples(Some(&single)).is_empty());
        assert!(clean_json_tuples(Some(&json!("(a, b, c)"))).is_empty());
    }

    #[test]
    fn unparsable_text_is_empty() {
        assert!(parse_import_document("{not json").is_empty());
        assert!(parse_import_document("").is_empty());
        assert_eq!(
            parse_import_document(r#"[{"subject":"a","predicate":"b","object":"c"}]"#),
            vec![Tuple::new("a", "b", "c")]
        );
    }
}
