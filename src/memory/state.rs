use super::restructure::GraphDelta;
use crate::domain::{CanonicalKey, Edge, EdgeId, EdgeKey, Node, NodeId};
use crate::errors::InvariantViolation;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{error, info, warn};

/// The accumulated graph. Read-only outside this module; it changes only through [`reduce`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        let key = CanonicalKey::of(label);
        self.nodes.iter().find(|node| node.key() == key)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut node_ids = HashSet::new();
        let mut keys: HashMap<NodeId, CanonicalKey> = HashMap::new();
        let mut seen_keys = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id) {
                return Err(InvariantViolation::DuplicateNodeId(node.id));
            }
            let key = node.key();
            if !seen_keys.insert(key.clone()) {
                return Err(InvariantViolation::DuplicateNodeKey(key));
            }
            keys.insert(node.id, key);
        }

        let mut edge_ids = HashSet::new();
        let mut edge_keys = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id) {
                return Err(InvariantViolation::DuplicateEdgeId(edge.id));
            }
            for endpoint in [edge.source, edge.target] {
                if !keys.contains_key(&endpoint) {
                    return Err(InvariantViolation::DanglingEdge {
                        edge: edge.id,
                        node: endpoint,
                    });
                }
            }
            if let Some(key) = edge_key(&keys, edge) {
                if !edge_keys.insert(key.clone()) {
                    return Err(InvariantViolation::DuplicateEdgeKey(key));
                }
            }
        }
        Ok(())
    }
}

/// The only ways to change a [`GraphState`].
#[derive(Debug, Clone)]
pub enum GraphAction {
    AddNodesAndEdges(GraphDelta),
    ClearGraph,
}

impl GraphAction {
    pub fn name(&self) -> &'static str {
        match self {
            GraphAction::AddNodesAndEdges(_) => "ADD_NODES_AND_EDGES",
            GraphAction::ClearGraph => "CLEAR_GRAPH",
        }
    }
}

/// Pure transition function. Total: every action on every state yields a state.
pub fn reduce(state: GraphState, action: GraphAction) -> GraphState {
    let next = match action {
        GraphAction::AddNodesAndEdges(delta) => merge(state, delta),
        GraphAction::ClearGraph => GraphState::empty(),
    };
    debug_assert_eq!(next.check_invariants(), Ok(()));
    next
}

/// Merges against the whole accumulated state: existing nodes are reused by canonical key
/// and edges already present by identity key are skipped.
fn merge(mut state: GraphState, delta: GraphDelta) -> GraphState {
    let mut by_key: HashMap<CanonicalKey, NodeId> = HashMap::new();
    let mut keys: HashMap<NodeId, CanonicalKey> = HashMap::new();
    for node in &state.nodes {
        by_key.insert(node.key(), node.id);
        keys.insert(node.id, node.key());
    }

    let mut resolved: HashMap<NodeId, NodeId> = HashMap::new();
    for mut node in delta.nodes {
        let key = node.key();
        if let Some(&existing) = by_key.get(&key) {
            resolved.insert(node.id, existing);
            continue;
        }
        let delta_id = node.id;
        if keys.contains_key(&node.id) {
            warn!(node = %node.id, "delta node id already used by another entity; reassigning");
            node.id = NodeId::new();
        }
        by_key.insert(key.clone(), node.id);
        keys.insert(node.id, key);
        resolved.insert(delta_id, node.id);
        state.nodes.push(node);
    }

    let mut edge_ids: HashSet<EdgeId> = state.edges.iter().map(|edge| edge.id).collect();
    let mut edge_keys: HashSet<EdgeKey> = state
        .edges
        .iter()
        .filter_map(|edge| edge_key(&keys, edge))
        .collect();

    for mut edge in delta.edges {
        let (Some(&source), Some(&target)) =
            (resolved.get(&edge.source), resolved.get(&edge.target))
        else {
            error!(edge = %edge.id, "delta edge references a node outside the delta; skipping");
            continue;
        };
        edge.source = source;
        edge.target = target;
        let Some(key) = edge_key(&keys, &edge) else {
            continue;
        };
        if !edge_keys.insert(key) {
            continue;
        }
        if !edge_ids.insert(edge.id) {
            edge.id = EdgeId::new();
            edge_ids.insert(edge.id);
        }
        state.edges.push(edge);
    }
    state
}

fn edge_key(keys: &HashMap<NodeId, CanonicalKey>, edge: &Edge) -> Option<EdgeKey> {
    Some(EdgeKey {
        source: keys.get(&edge.source)?.clone(),
        predicate: CanonicalKey::of(&edge.label),
        target: keys.get(&edge.target)?.clone(),
    })
}

/// Single control point owning the [`GraphState`]; actions are applied one at a time.
#[derive(Debug, Default)]
pub struct GraphStore {
    state: GraphState,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn dispatch(&mut self, action: GraphAction) -> &GraphState {
        let name = action.name();
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
        info!(
            action = name,
            nodes = self.state.nodes.len(),
            edges = self.state.edges.len(),
            "graph updated"
        );
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tuple;
    use crate::ingestion::delta_from_tuples;

    fn add(state: GraphState, tuples: &[Tuple]) -> GraphState {
        reduce(state, GraphAction::AddNodesAndEdges(delta_from_tuples(tuples)))
    }

    #[test]
    fn same_delta_twice_does_not_grow() {
        let delta = delta_from_tuples(&[
            Tuple::new("Paris", "capitalOf", "France"),
            Tuple::new("France", "partOf", "Europe"),
        ]);
        let once = reduce(GraphState::empty(), GraphAction::AddNodesAndEdges(delta.clone()));
        let twice = reduce(once.clone(), GraphAction::AddNodesAndEdges(delta));
        assert_eq!(once, twice);
        assert_eq!(twice.nodes().len(), 3);
        assert_eq!(twice.edges().len(), 2);
    }

    #[test]
    fn overlapping_passes_reuse_existing_ids() {
        let state = add(GraphState::empty(), &[Tuple::new("Paris", "capitalOf", "France")]);
        let paris = state.node_by_label("paris").unwrap().id;

        let state = add(
            state,
            &[
                Tuple::new("PARIS", "locatedIn", "Europe"),
                Tuple::new("paris", "CAPITALOF", "france"),
            ],
        );
        assert_eq!(state.nodes().len(), 3);
        assert_eq!(state.edges().len(), 2);
        assert_eq!(state.node(paris).unwrap().label, "Paris");
        assert!(state.edges().iter().all(|e| e.source == paris));
    }

    #[test]
    fn existing_ids_survive_later_merges() {
        let first = add(GraphState::empty(), &[Tuple::new("a", "r", "b")]);
        let ids: Vec<NodeId> = first.nodes().iter().map(|n| n.id).collect();
        let edge_id = first.edges()[0].id;

        let later = add(first, &[Tuple::new("B", "r", "c"), Tuple::new("A", "r", "B")]);
        for id in ids {
            assert!(later.node(id).is_some());
        }
        assert_eq!(later.edges()[0].id, edge_id);
        assert_eq!(later.edges().len(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let state = add(GraphState::empty(), &[Tuple::new("a", "r", "b")]);
        let state = reduce(state, GraphAction::ClearGraph);
        assert!(state.is_empty());
        assert_eq!(reduce(GraphState::empty(), GraphAction::ClearGraph), GraphState::empty());
    }

    #[test]
    fn edges_with_unknown_endpoints_are_skipped() {
        let mut delta = delta_from_tuples(&[Tuple::new("a", "r", "b")]);
        delta.edges.push(Edge::new(NodeId::new(), delta.nodes[0].id, "dangling"));
        let state = reduce(GraphState::empty(), GraphAction::AddNodesAndEdges(delta));
        assert_eq!(state.edges().len(), 1);
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn unrestructured_delta_still_merges_cleanly() {
        let delta = GraphDelta {
            nodes: vec![Node::new("Rome"), Node::new("rome")],
            edges: Vec::new(),
        };
        let state = reduce(GraphState::empty(), GraphAction::AddNodesAndEdges(delta));
        assert_eq!(state.nodes().len(), 1);
    }

    #[test]
    fn check_invariants_reports_duplicates() {
        let state = GraphState {
            nodes: vec![Node::new("X"), Node::new("x")],
            edges: Vec::new(),
        };
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DuplicateNodeKey(CanonicalKey::of("x")))
        );

        let node = Node::new("a");
        let missing = NodeId::new();
        let edge = Edge::new(node.id, missing, "r");
        let state = GraphState {
            nodes: vec![node],
            edges: vec![edge.clone()],
        };
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DanglingEdge {
                edge: edge.id,
                node: missing,
            })
        );
    }

    #[test]
    fn store_dispatches_sequentially() {
        let mut store = GraphStore::new();
        store.dispatch(GraphAction::AddNodesAndEdges(delta_from_tuples(&[Tuple::new(
            "a", "r", "b",
        )])));
        assert_eq!(store.state().edges().len(), 1);
        store.dispatch(GraphAction::ClearGraph);
        assert!(store.state().is_empty());
    }
}
