//! Registry of property indexes
//!
//! Creates and looks up one [`Index`] per indexed property key. The
//! registry lock is distinct from the graph's structural lock and from
//! every entity lock; in the lock hierarchy it is only ever taken last,
//! from inside a property-mutation section or the graph's removal cascade.

use super::property_index::Index;
use crate::graph::{EdgeId, NodeId, PropertyMap};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Manager for all property indexes, keyed by property name.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: RwLock<FxHashMap<String, Arc<Index>>>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index for a property key. Idempotent: an existing index
    /// for the key is left untouched.
    pub fn create_index(&self, key: impl Into<String>) {
        let mut indexes = self.indexes.write().unwrap();
        indexes.entry(key.into()).or_insert_with(|| Arc::new(Index::new()));
    }

    /// Look up the index for a key, if one has been created.
    pub fn get_index(&self, key: &str) -> Option<Arc<Index>> {
        self.indexes.read().unwrap().get(key).cloned()
    }

    /// Check if an index exists
    pub fn has_index(&self, key: &str) -> bool {
        self.indexes.read().unwrap().contains_key(key)
    }

    /// Remove every index entry a node holds, across all live indexes.
    /// Used by the graph's removal cascade.
    pub fn purge_node(&self, id: NodeId, properties: &PropertyMap) {
        for (key, value) in properties {
            if let Some(index) = self.get_index(key) {
                index.remove_node(value, id);
            }
        }
    }

    /// Remove every index entry an edge holds, across all live indexes.
    pub fn purge_edge(&self, id: EdgeId, properties: &PropertyMap) {
        for (key, value) in properties {
            if let Some(index) = self.get_index(key) {
                index.remove_edge(value, id);
            }
        }
    }
}
