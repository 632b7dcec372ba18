//! Structural defects of the accumulated graph.

use crate::domain::{CanonicalKey, EdgeId, EdgeKey, NodeId};

/// A broken [`GraphState`](crate::memory::GraphState) invariant.
///
/// These never come from bad input data; they indicate a bug in restructuring or merging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("two nodes share the canonical key `{0}`")]
    DuplicateNodeKey(CanonicalKey),

    #[error("two edges share the identity `{0}`")]
    DuplicateEdgeKey(EdgeKey),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("node id {0} is used more than once")]
    DuplicateNodeId(NodeId),

    #[error("edge id {0} is used more than once")]
    DuplicateEdgeId(EdgeId),
}
