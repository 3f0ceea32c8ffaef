//! Directed edge entity for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::{EdgeId, NodeId};
use crate::index::IndexManager;
use std::sync::RwLock;

/// Default weight for edges created without an explicit one.
pub const DEFAULT_EDGE_WEIGHT: i64 = 1;

/// A directed edge in the property graph.
///
/// Endpoints and label are fixed at creation; the weight (consumed by
/// shortest-path queries, default 1) and the property map are mutable
/// behind the edge's own reader/writer lock.
#[derive(Debug)]
pub struct Edge {
    id: EdgeId,
    from: NodeId,
    to: NodeId,
    label: String,
    inner: RwLock<EdgeInner>,
}

#[derive(Debug)]
struct EdgeInner {
    weight: i64,
    properties: PropertyMap,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, from: NodeId, to: NodeId, label: String, weight: i64) -> Self {
        Edge {
            id,
            from,
            to,
            label,
            inner: RwLock::new(EdgeInner {
                weight,
                properties: PropertyMap::new(),
            }),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Source node (edge goes FROM this node)
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Target node (edge goes TO this node)
    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weight(&self) -> i64 {
        self.inner.read().unwrap().weight
    }

    /// Set the edge weight. Weight is not indexable, so no index is touched.
    pub fn set_weight(&self, weight: i64) {
        self.inner.write().unwrap().weight = weight;
    }

    /// Upsert a property value, swapping the indexed entry (if `key` has a
    /// live index) inside the edge's write section. See
    /// [`Node::set_property`](super::Node::set_property).
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
            index.update_edge(inner.properties.get(&key), &value, self.id);
        }
        inner.properties.insert(key, value);
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.inner.read().unwrap().properties.contains_key(key)
    }

    /// Get a property value; missing keys are `PropertyNotFound`.
    pub fn get_property(&self, key: &str) -> GraphResult<PropertyValue> {
        self.inner
            .read()
            .unwrap()
            .properties
            .get(key)
            .cloned()
            .ok_or_else(|| GraphError::PropertyNotFound(key.to_string()))
    }

    /// Remove a property and its index entry in one locked section.
    pub fn remove_property(&self, key: &str, indexes: &IndexManager) {
        let mut inner = self.inner.write().unwrap();
        if let Some(old) = inner.properties.remove(key) {
            if let Some(index) = indexes.get_index(key) {
                index.remove_edge(&old, self.id);
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

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
