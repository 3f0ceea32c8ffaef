//! Snapshot persistence
//!
//! Binary save/load of a whole graph. Sits outside the core engine: its
//! correctness leans on the graph's id-allocation contract (restore entry
//! points plus counter re-seeding), not the other way around.

pub mod snapshot;

pub use snapshot::{load, save, SnapshotError, SnapshotResult};
