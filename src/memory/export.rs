use super::state::GraphState;
use crate::domain::{Node, NodeId, Tuple};
use serde_json::{json, Value};
use std::collections::HashMap;

/// One tuple per edge, with endpoint ids resolved back to node labels. Edge order is kept.
pub fn export_tuples(state: &GraphState) -> Vec<Tuple> {
    let nodes: HashMap<NodeId, &Node> = state.nodes().iter().map(|node| (node.id, node)).collect();
    state
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = nodes.get(&edge.source)?;
            let target = nodes.get(&edge.target)?;
            Some(Tuple::new(
                source.label.as_str(),
                edge.label.as_str(),
                target.label.as_str(),
            ))
        })
        .collect()
}

/// The export document: a JSON array of `{subject, predicate, object}` objects.
pub fn export_document(state: &GraphState) -> Value {
    Value::Array(
        export_tuples(state)
            .into_iter()
            .map(|tuple| {
                json!({
                    "subject": tuple.subject,
                    "predicate": tuple.predicate,
                    "object": tuple.object,
                })
            })
            .collect(),
    )
}

/// Pretty-printed export document. An empty graph gives `[]`.
pub fn export_string(state: &GraphState) -> String {
    format!("{:#}", export_document(state))
}
