//! Node entity for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::{EdgeId, NodeId};
use crate::index::IndexManager;
use rustc_hash::FxHashSet;
use std::sync::RwLock;

/// A node in the property graph.
///
/// A node holds its own incoming/outgoing edge-id sets and property map
/// behind one reader/writer lock. Relationships are ids resolved through
/// the owning [`Graph`](crate::graph::Graph), never direct references, so
/// nodes and edges form no ownership cycles.
///
/// Nodes are created and destroyed exclusively through the owning graph.
/// A handle obtained from [`Graph::get_node`](crate::graph::Graph::get_node)
/// stays usable after the node is removed, but is then detached: the graph
/// no longer resolves its id.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    inner: RwLock<NodeInner>,
}

#[derive(Debug, Default)]
struct NodeInner {
    incoming: FxHashSet<EdgeId>,
    outgoing: FxHashSet<EdgeId>,
    properties: PropertyMap,
}

impl Node {
    pub(crate) fn new(id: NodeId) -> Self {
        Node {
            id,
            inner: RwLock::new(NodeInner::default()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Snapshot of the outgoing edge ids. Unordered.
    pub fn out_edges(&self) -> Vec<EdgeId> {
        self.inner.read().unwrap().outgoing.iter().copied().collect()
    }

    /// Snapshot of the incoming edge ids. Unordered.
    pub fn in_edges(&self) -> Vec<EdgeId> {
        self.inner.read().unwrap().incoming.iter().copied().collect()
    }

    pub(crate) fn add_outgoing_edge(&self, edge_id: EdgeId) {
        self.inner.write().unwrap().outgoing.insert(edge_id);
    }

    pub(crate) fn add_incoming_edge(&self, edge_id: EdgeId) {
        self.inner.write().unwrap().incoming.insert(edge_id);
    }

    pub(crate) fn remove_outgoing_edge(&self, edge_id: EdgeId) {
        self.inner.write().unwrap().outgoing.remove(&edge_id);
    }

    pub(crate) fn remove_incoming_edge(&self, edge_id: EdgeId) {
        self.inner.write().unwrap().incoming.remove(&edge_id);
    }

    /// Upsert a property value.
    ///
    /// If `key` has a live index, the index entry is swapped while the
    /// node's write lock is held, so a finder never observes a value that
    /// disagrees with its index entry. The index manager is an explicit
    /// parameter rather than stored state; the dependency is visible at
    /// every mutating call site.
    pub fn set_property(
        &self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
        indexes: &IndexManager,
    ) {
        let key = key.into();
        let value = value.into();
        let mut inner = self.inner.write().unwrap();
        if let Some(index) = indexes.get_index(&key) {
            index.update_node(inner.properties.get(&key), &value, self.id);
        }
        inner.properties.insert(key, value);
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.inner.read().unwrap().properties.contains_key(key)
    }

    /// Get a property value; `PropertyValue` has no "absent" variant, so a
    /// missing key is a `PropertyNotFound` error.
    pub fn get_property(&self, key: &str) -> GraphResult<PropertyValue> {
        self.inner
            .read()
            .unwrap()
            .properties
            .get(key)
            .cloned()
            .ok_or_else(|| GraphError::PropertyNotFound(key.to_string()))
    }

    /// Remove a property; the indexed entry (if any) goes with it in the
    /// same locked section. Removing an absent key is a no-op.
    pub fn remove_property(&self, key: &str, indexes: &IndexManager) {
        let mut inner = self.inner.write().unwrap();
        if let Some(old) = inner.properties.remove(key) {
            if let Some(index) = indexes.get_index(key) {
                index.remove_node(&old, self.id);
            }
        }
    }

    /// Snapshot of the full property map.
    pub fn properties(&self) -> PropertyMap {
        self.inner.read().unwrap().properties.clone()
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.inner.read().unwrap().properties.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
