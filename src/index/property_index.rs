//! Ordered secondary index over one property key

use crate::graph::{EdgeId, NodeId, PropertyValue};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Secondary index for a single property key: an ordered multimap from
/// property value to the ids currently holding that value.
///
/// Node and edge ids live in separate maps so a node lookup never returns
/// an edge id that happens to share the raw value. One lock covers both
/// maps; the index is shared by every entity carrying the key, and
/// concurrent inserts/removes from unrelated entities' property-lock
/// sections serialize here and nowhere else.
#[derive(Debug, Default)]
pub struct Index {
    inner: RwLock<IndexInner>,
}

#[derive(Debug, Default)]
struct IndexInner {
    nodes: BTreeMap<PropertyValue, FxHashSet<NodeId>>,
    edges: BTreeMap<PropertyValue, FxHashSet<EdgeId>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `id` with `value`. Multiple ids may share a value.
    pub fn insert_node(&self, value: PropertyValue, id: NodeId) {
        let mut inner = self.inner.write().unwrap();
        inner.nodes.entry(value).or_default().insert(id);
    }

    /// Disassociate `id` from `value`; the value entry is dropped once its
    /// id set empties.
    pub fn remove_node(&self, value: &PropertyValue, id: NodeId) {
        let mut inner = self.inner.write().unwrap();
        if let Some(ids) = inner.nodes.get_mut(value) {
            ids.remove(&id);
            if ids.is_empty() {
                inner.nodes.remove(value);
            }
        }
    }

    /// Swap `id`'s entry from `old` to `new` in one locked step, so a
    /// concurrent finder observes exactly one of the two states and never
    /// both entries or neither.
    pub fn update_node(&self, old: Option<&PropertyValue>, new: &PropertyValue, id: NodeId) {
        let mut inner = self.inner.write().unwrap();
        if let Some(old) = old {
            if let Some(ids) = inner.nodes.get_mut(old) {
                ids.remove(&id);
                if ids.is_empty() {
                    inner.nodes.remove(old);
                }
            }
        }
        inner.nodes.entry(new.clone()).or_default().insert(id);
    }

    /// All node ids currently associated with exactly `value`. Unordered.
    pub fn find_nodes(&self, value: &PropertyValue) -> Vec<NodeId> {
        self.inner
            .read()
            .unwrap()
            .nodes
            .get(value)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn insert_edge(&self, value: PropertyValue, id: EdgeId) {
        let mut inner = self.inner.write().unwrap();
        inner.edges.entry(value).or_default().insert(id);
    }

    pub fn remove_edge(&self, value: &PropertyValue, id: EdgeId) {
        let mut inner = self.inner.write().unwrap();
        if let Some(ids) = inner.edges.get_mut(value) {
            ids.remove(&id);
            if ids.is_empty() {
                inner.edges.remove(value);
            }
        }
    }

    pub fn update_edge(&self, old: Option<&PropertyValue>, new: &PropertyValue, id: EdgeId) {
        let mut inner = self.inner.write().unwrap();
        if let Some(old) = old {
            if let Some(ids) = inner.edges.get_mut(old) {
                ids.remove(&id);
                if ids.is_empty() {
                    inner.edges.remove(old);
                }
            }
        }
        inner.edges.entry(new.clone()).or_default().insert(id);
    }

    /// All edge ids currently associated with exactly `value`. Unordered.
    pub fn find_edges(&self, value: &PropertyValue) -> Vec<EdgeId> {
        self.inner
            .read()
            .unwrap()
            .edges
            .get(value)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// True when no value maps to any id.
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().unwrap();
        inner.nodes.is_empty() && inner.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_multimap_semantics() {
        let index = Index::new();
        let val = PropertyValue::Integer(100);
        index.insert_node(val.clone(), NodeId::new(1));
        index.insert_node(val.clone(), NodeId::new(2));

        let mut found = index.find_nodes(&val);
        found.sort();
        assert_eq!(found, vec![NodeId::new(1), NodeId::new(2)]);

        index.remove_node(&val, NodeId::new(1));
        assert_eq!(index.find_nodes(&val), vec![NodeId::new(2)]);

        index.remove_node(&val, NodeId::new(2));
        assert!(index.find_nodes(&val).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_update_swaps_entry() {
        let index = Index::new();
        let old = PropertyValue::Text("x".into());
        let new = PropertyValue::Text("y".into());

        index.insert_node(old.clone(), NodeId::new(5));
        index.update_node(Some(&old), &new, NodeId::new(5));

        assert!(index.find_nodes(&old).is_empty());
        assert_eq!(index.find_nodes(&new), vec![NodeId::new(5)]);
    }

    #[test]
    fn test_node_and_edge_ids_do_not_mix() {
        let index = Index::new();
        let val = PropertyValue::Integer(7);
        index.insert_node(val.clone(), NodeId::new(3));
        index.insert_edge(val.clone(), EdgeId::new(3));

        assert_eq!(index.find_nodes(&val), vec![NodeId::new(3)]);
        assert_eq!(index.find_edges(&val), vec![EdgeId::new(3)]);

        index.remove_node(&val, NodeId::new(3));
        assert!(index.find_nodes(&val).is_empty());
        assert_eq!(index.find_edges(&val), vec![EdgeId::new(3)]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let index = Index::new();
        index.remove_node(&PropertyValue::Boolean(true), NodeId::new(9));
        assert!(index.is_empty());
    }
}
