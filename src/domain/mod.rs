mod edge;
mod key;
mod node;
mod tuple;

pub use edge::{Edge, EdgeId};
pub use key::{CanonicalKey, EdgeKey};
pub use node::{Node, NodeId};
pub use tuple::Tuple;
