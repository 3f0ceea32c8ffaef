//! Core graph engine
//!
//! The property-graph data model: nodes and edges with typed key/value
//! properties, owned by a concurrent [`Graph`] container that allocates
//! ids, enforces structural invariants, and keeps the secondary indexes
//! synchronously consistent with property mutations.

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

pub use edge::{Edge, DEFAULT_EDGE_WEIGHT};
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{Graph, GraphError, GraphResult};
pub use types::{EdgeId, NodeId};
