//! Graph traversal and shortest-path algorithms
//!
//! Pure read-only consumers of [`Graph`](crate::graph::Graph)'s query
//! surface; none take locks of their own.

pub mod pathfinding;
pub mod traversal;

pub use pathfinding::{dijkstra, UNREACHABLE};
pub use traversal::{bfs, bfs_level, dfs};
