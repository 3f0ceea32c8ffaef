//! Secondary-index layer
//!
//! One ordered index per indexed property key, mapping a property value to
//! the set of entity ids currently holding that value, kept synchronously
//! consistent with property mutations.

pub mod manager;
pub mod property_index;

pub use manager::IndexManager;
pub use property_index::Index;
