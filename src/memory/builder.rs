use crate::domain::{Edge, Node, NodeId, Tuple};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// First-pass graph: one edge per tuple, nodes shared only between identical labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Maps tuples to nodes and edges without any canonicalization.
///
/// Subjects and objects are matched by exact string equality within this call only
/// (labels are stored trimmed); tuples with a blank field are skipped.
/// case variants and cross-call duplicates are left for [`restructure`](super::restructure)
/// and the reducer.
pub fn build_graph(tuples: &[Tuple]) -> RawGraph {
    let mut graph = RawGraph::default();
    let mut by_label: HashMap<&str, NodeId> = HashMap::new();

    for tuple in tuples {
        if [&tuple.subject, &tuple.predicate, &tuple.object]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            debug!(%tuple, "skipping tuple with a blank field");
            continue;
        }
        let source = node_for(&mut graph.nodes, &mut by_label, &tuple.subject);
        let target = node_for(&mut graph.nodes, &mut by_label, &tuple.object);
        graph
            .edges
            .push(Edge::new(source, target, tuple.predicate.trim()));
    }
    graph
}

fn node_for<'a>(
    nodes: &mut Vec<Node>,
    by_label: &mut HashMap<&'a str, NodeId>,
    label: &'a str,
) -> NodeId {
    *by_label.entry(label).or_insert_with(|| {
        let node = Node::new(label.trim());
        let id = node.id;
        nodes.push(node);
        id
    })
}
