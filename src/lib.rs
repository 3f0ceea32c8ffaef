//! WeftDB — embeddable concurrent property-graph store
//!
//! Nodes and edges carry typed key/value properties, secondary indexes
//! keep property lookups fast and synchronously consistent, and
//! traversal/shortest-path queries run over the same store — all under
//! concurrent access from multiple threads sharing one [`graph::Graph`].
//!
//! # Architecture
//!
//! - [`graph`] — the core engine: entity model, owning container, id
//!   allocation, structural-mutation protocol, cascading deletion.
//! - [`index`] — ordered secondary indexes per property key, maintained
//!   inside the entities' property-write sections.
//! - [`algo`] — BFS, bounded BFS, DFS, and Dijkstra over the graph's
//!   read surface.
//! - [`query`] — the traversal query mini-language.
//! - [`persistence`] — binary snapshot save/load.
//! - [`buffer`] — page-cache prototype, not wired into the engine.
//!
//! # Example
//!
//! ```rust
//! use weftdb::graph::{Graph, PropertyValue};
//! use weftdb::algo::bfs;
//!
//! let g = Graph::new();
//! let alice = g.create_node();
//! let bob = g.create_node();
//! g.create_edge(alice, bob, "KNOWS").unwrap();
//!
//! g.create_index("name");
//! g.get_node(alice).unwrap().set_property("name", "Alice", g.indexes());
//!
//! assert_eq!(g.find_nodes("name", &PropertyValue::Text("Alice".into())), vec![alice]);
//! assert_eq!(bfs(&g, alice), vec![alice, bob]);
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod buffer;
pub mod graph;
pub mod index;
pub mod persistence;
pub mod query;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, Graph, GraphError, GraphResult, Node, NodeId, PropertyMap, PropertyValue,
};

pub use index::{Index, IndexManager};

pub use query::{parse_traversal, TraversalQuery};

pub use persistence::{SnapshotError, SnapshotResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
