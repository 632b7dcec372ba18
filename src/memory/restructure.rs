use super::builder::RawGraph;
use crate::domain::{CanonicalKey, Edge, EdgeKey, Node, NodeId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// A restructured extraction pass: node keys and edge keys are unique within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphDelta {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDelta {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Collapses nodes sharing a canonical key and edges sharing an identity key.
///
/// The first node seen in each group survives with its id and original casing. Edge
/// endpoints are rewritten to the survivors, then edges are deduplicated keeping the
/// first occurrence.
pub fn restructure(raw: RawGraph) -> GraphDelta {
    let raw_nodes = raw.nodes.len();
    let raw_edges = raw.edges.len();

    let mut survivors: HashMap<CanonicalKey, NodeId> = HashMap::new();
    let mut survivor_keys: HashMap<NodeId, CanonicalKey> = HashMap::new();
    let mut redirect: HashMap<NodeId, NodeId> = HashMap::new();
    let mut nodes = Vec::new();

    for node in raw.nodes {
        let key = node.key();
        if let Some(&survivor) = survivors.get(&key) {
            redirect.insert(node.id, survivor);
            continue;
        }
        survivors.insert(key.clone(), node.id);
        survivor_keys.insert(node.id, key);
        redirect.insert(node.id, node.id);
        nodes.push(node);
    }

    let mut seen: HashSet<EdgeKey> = HashSet::new();
    let mut edges = Vec::new();
    for mut edge in raw.edges {
        let (Some(&source), Some(&target)) =
            (redirect.get(&edge.source), redirect.get(&edge.target))
        else {
            error!(edge = %edge.id, "edge endpoint is not part of the graph; dropping it");
            continue;
        };
        let (Some(source_key), Some(target_key)) =
            (survivor_keys.get(&source), survivor_keys.get(&target))
        else {
            continue;
        };
        let key = EdgeKey {
            source: source_key.clone(),
            predicate: CanonicalKey::of(&edge.label),
            target: target_key.clone(),
        };
        if seen.insert(key) {
            edge.source = source;
            edge.target = target;
            edges.push(edge);
        }
    }

    debug!(
        raw_nodes,
        raw_edges,
        nodes = nodes.len(),
        edges = edges.len(),
        "graph restructured"
    );
    GraphDelta { nodes, edges }
}
