mod builder;
mod export;
mod persistence;
mod restructure;
mod state;

pub use builder::{build_graph, RawGraph};
pub use export::{export_document, export_string, export_tuples};
pub use persistence::{ExportWriter, TupleFileReader};
pub use restructure::{restructure, GraphDelta};
pub use state::{reduce, GraphAction, GraphState, GraphStore};
