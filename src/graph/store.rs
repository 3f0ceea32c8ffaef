//! The owning graph container
//!
//! `Graph` exclusively owns every node and edge by id, allocates ids, and
//! enforces the structural invariants: edge sets and the edge map always
//! agree, endpoints of live edges always exist, ids are never reused.
//!
//! Locking follows a strict outer-to-inner hierarchy: the structural lock
//! here, then a single entity's own lock, then the index registry and the
//! target index. No path acquires them in any other order, and no path
//! re-enters the structural lock; the node-removal cascade goes through an
//! internal already-locked edge-removal routine for exactly that reason.

use super::edge::{Edge, DEFAULT_EDGE_WEIGHT};
use super::node::Node;
use super::property::PropertyValue;
use super::types::{EdgeId, NodeId};
use crate::index::IndexManager;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("edge source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("edge target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("property {0:?} not found")]
    PropertyNotFound(String),

    #[error("id 0 is reserved and cannot be assigned")]
    ReservedId,

    #[error("node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug)]
struct GraphInner {
    nodes: FxHashMap<NodeId, Arc<Node>>,
    edges: FxHashMap<EdgeId, Arc<Edge>>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl Default for GraphInner {
    fn default() -> Self {
        GraphInner {
            nodes: FxHashMap::default(),
            edges: FxHashMap::default(),
            // 0 is reserved as "no id"; both counters only ever increase.
            next_node_id: 1,
            next_edge_id: 1,
        }
    }
}

/// Concurrent in-memory property graph.
///
/// All operations take `&self` and synchronize internally; `Graph` is
/// shared across threads as-is (or behind an `Arc`). Structural reads take
/// the structural lock in shared mode, structural writes (including the
/// whole node-removal cascade) in exclusive mode. A sequence of calls is
/// not atomic as a whole: another thread's effects may interleave between
/// any two calls.
#[derive(Debug, Default)]
pub struct Graph {
    inner: RwLock<GraphInner>,
    indexes: IndexManager,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next node id and insert an empty node. Always succeeds.
    pub fn create_node(&self) -> NodeId {
        let mut inner = self.inner.write().unwrap();
        let id = NodeId::new(inner.next_node_id);
        inner.next_node_id += 1;
        inner.nodes.insert(id, Arc::new(Node::new(id)));
        debug!(node = %id, "created node");
        id
    }

    /// Remove a node and every edge incident to it, as one structural
    /// operation. Returns false if the node does not exist.
    ///
    /// Each cascaded edge is unregistered from the opposite endpoint's
    /// edge set and purged from any index holding its properties; the
    /// node's own indexed properties are purged last.
    pub fn remove_node(&self, id: NodeId) -> bool {
        let mut inner = self.inner.write().unwrap();
        let node = match inner.nodes.get(&id) {
            Some(node) => Arc::clone(node),
            None => return false,
        };

        // Union of both sets so a self-loop is removed exactly once.
        let mut incident: FxHashSet<EdgeId> = node.out_edges().into_iter().collect();
        incident.extend(node.in_edges());
        for edge_id in incident {
            Self::remove_edge_locked(&mut inner, &self.indexes, edge_id);
        }

        self.indexes.purge_node(id, &node.properties());
        inner.nodes.remove(&id);
        debug!(node = %id, "removed node");
        true
    }

    /// Look up a node. The returned handle stays valid if the node is
    /// later removed, but is then detached from the graph.
    pub fn get_node(&self, id: NodeId) -> Option<Arc<Node>> {
        self.inner.read().unwrap().nodes.get(&id).cloned()
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.inner.read().unwrap().nodes.contains_key(&id)
    }

    /// Create a directed edge with the default weight. Fails without
    /// consuming an id if either endpoint is missing, leaving the graph
    /// unchanged; no partially created edge is ever observable.
    pub fn create_edge(
        &self,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
    ) -> GraphResult<EdgeId> {
        self.create_edge_weighted(from, to, label, DEFAULT_EDGE_WEIGHT)
    }

    /// Create a directed edge with an explicit initial weight.
    pub fn create_edge_weighted(
        &self,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
        weight: i64,
    ) -> GraphResult<EdgeId> {
        let mut inner = self.inner.write().unwrap();

        // Validate before touching the counter so a failed call leaves no
        // id gap.
        if !inner.nodes.contains_key(&from) {
            return Err(GraphError::InvalidEdgeSource(from));
        }
        if !inner.nodes.contains_key(&to) {
            return Err(GraphError::InvalidEdgeTarget(to));
        }

        let id = EdgeId::new(inner.next_edge_id);
        inner.next_edge_id += 1;
        inner
            .edges
            .insert(id, Arc::new(Edge::new(id, from, to, label.into(), weight)));
        inner.nodes[&from].add_outgoing_edge(id);
        inner.nodes[&to].add_incoming_edge(id);
        debug!(edge = %id, %from, %to, "created edge");
        Ok(id)
    }

    /// Remove an edge, unregistering it from both endpoints' edge sets and
    /// from any index holding its properties. False if absent.
    pub fn remove_edge(&self, id: EdgeId) -> bool {
        let mut inner = self.inner.write().unwrap();
        let removed = Self::remove_edge_locked(&mut inner, &self.indexes, id);
        if removed {
            debug!(edge = %id, "removed edge");
        }
        removed
    }

    /// Edge removal for callers already holding the structural write lock.
    /// The public entry points must not be re-entered from the cascade;
    /// the structural lock is not re-entrant.
    fn remove_edge_locked(inner: &mut GraphInner, indexes: &IndexManager, id: EdgeId) -> bool {
        let edge = match inner.edges.remove(&id) {
            Some(edge) => edge,
            None => return false,
        };
        if let Some(from) = inner.nodes.get(&edge.from()) {
            from.remove_outgoing_edge(id);
        }
        if let Some(to) = inner.nodes.get(&edge.to()) {
            to.remove_incoming_edge(id);
        }
        indexes.purge_edge(id, &edge.properties());
        true
    }

    /// Look up an edge. Same detachment semantics as [`Graph::get_node`].
    pub fn get_edge(&self, id: EdgeId) -> Option<Arc<Edge>> {
        self.inner.read().unwrap().edges.get(&id).cloned()
    }

    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.inner.read().unwrap().edges.contains_key(&id)
    }

    /// Targets of the node's outgoing edges. Empty if the node is absent.
    /// Order follows the edge set's iteration order (unordered).
    pub fn get_neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let inner = self.inner.read().unwrap();
        let node = match inner.nodes.get(&id) {
            Some(node) => node,
            None => return Vec::new(),
        };
        node.out_edges()
            .into_iter()
            .filter_map(|edge_id| inner.edges.get(&edge_id).map(|edge| edge.to()))
            .collect()
    }

    /// Outgoing edge ids of a node. Empty if the node is absent.
    pub fn out_edges(&self, id: NodeId) -> Vec<EdgeId> {
        let inner = self.inner.read().unwrap();
        inner
            .nodes
            .get(&id)
            .map(|node| node.out_edges())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().unwrap().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().unwrap().edges.len()
    }

    /// Snapshot of all node ids. Unordered.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.inner.read().unwrap().nodes.keys().copied().collect()
    }

    /// Snapshot of all edge ids. Unordered.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.inner.read().unwrap().edges.keys().copied().collect()
    }

    /// Create a secondary index on a property key. Idempotent.
    pub fn create_index(&self, key: impl Into<String>) {
        self.indexes.create_index(key);
    }

    /// Node ids currently holding `key = value`, per the key's index.
    /// Empty if no index exists for the key.
    pub fn find_nodes(&self, key: &str, value: &PropertyValue) -> Vec<NodeId> {
        self.indexes
            .get_index(key)
            .map(|index| index.find_nodes(value))
            .unwrap_or_default()
    }

    /// Edge-side analogue of [`Graph::find_nodes`].
    pub fn find_edges(&self, key: &str, value: &PropertyValue) -> Vec<EdgeId> {
        self.indexes
            .get_index(key)
            .map(|index| index.find_edges(value))
            .unwrap_or_default()
    }

    /// The index registry, for property-mutating call sites.
    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    /// Insert a node under a caller-chosen id, re-seeding the id counter
    /// past it. Snapshot loading needs ids preserved exactly; the
    /// allocating [`Graph::create_node`] cannot express that.
    pub fn restore_node(&self, id: NodeId) -> GraphResult<Arc<Node>> {
        if id.as_u64() == 0 {
            return Err(GraphError::ReservedId);
        }
        let mut inner = self.inner.write().unwrap();
        if inner.nodes.contains_key(&id) {
            return Err(GraphError::NodeAlreadyExists(id));
        }
        let node = Arc::new(Node::new(id));
        inner.nodes.insert(id, Arc::clone(&node));
        inner.next_node_id = inner.next_node_id.max(id.as_u64() + 1);
        Ok(node)
    }

    /// Insert an edge under a caller-chosen id. Endpoints must already be
    /// restored; the edge-id counter is re-seeded past the id.
    pub fn restore_edge(
        &self,
        id: EdgeId,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
        weight: i64,
    ) -> GraphResult<Arc<Edge>> {
        if id.as_u64() == 0 {
            return Err(GraphError::ReservedId);
        }
        let mut inner = self.inner.write().unwrap();
        if inner.edges.contains_key(&id) {
            return Err(GraphError::EdgeAlreadyExists(id));
        }
        if !inner.nodes.contains_key(&from) {
            return Err(GraphError::InvalidEdgeSource(from));
        }
        if !inner.nodes.contains_key(&to) {
            return Err(GraphError::InvalidEdgeTarget(to));
        }
        let edge = Arc::new(Edge::new(id, from, to, label.into(), weight));
        inner.edges.insert(id, Arc::clone(&edge));
        inner.nodes[&from].add_outgoing_edge(id);
        inner.nodes[&to].add_incoming_edge(id);
        inner.next_edge_id = inner.next_edge_id.max(id.as_u64() + 1);
        Ok(edge)
    }
}
