pub mod domain;
pub mod errors;
pub mod ingestion;
pub mod memory;
pub mod session;
pub mod utils;

pub use domain::{CanonicalKey, Edge, EdgeId, EdgeKey, Node, NodeId, Tuple};
pub use errors::InvariantViolation;
pub use ingestion::{
    clean_json_tuples, extract_tuples, ChatCompletionClient, CompletionClient, CompletionConfig,
    IngestionPipeline, PromptTemplate, Provider,
};
pub use memory::{
    build_graph, export_document, export_string, reduce, restructure, GraphAction, GraphDelta,
    GraphState, GraphStore,
};
pub use session::{MergeSummary, Session};
