//! Single-source shortest paths

use crate::graph::{Graph, NodeId};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Distance assigned to nodes the source cannot reach.
pub const UNREACHABLE: i64 = i64::MAX;

/// Dijkstra's algorithm over integer edge weights (assumed non-negative;
/// default weight 1).
///
/// Returns the distance from `start` to every node present when the
/// traversal sampled the node set; unreached nodes map to [`UNREACHABLE`].
///
/// The frontier uses lazy deletion: a node may be pushed again each time
/// its tentative distance improves, so a popped entry whose distance is
/// worse than the current best for that node is stale and is skipped.
/// Duplicate stale entries are expected and harmless.
pub fn dijkstra(g: &Graph, start: NodeId) -> FxHashMap<NodeId, i64> {
    let mut distances: FxHashMap<NodeId, i64> = g
        .node_ids()
        .into_iter()
        .map(|id| (id, UNREACHABLE))
        .collect();
    distances.insert(start, 0);

    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0i64, start)));

    while let Some(Reverse((dist, current))) = heap.pop() {
        // Stale entry: a shorter path to `current` was settled after this
        // one was enqueued.
        if dist > *distances.get(&current).unwrap_or(&UNREACHABLE) {
            continue;
        }

        for edge_id in g.out_edges(current) {
            let edge = match g.get_edge(edge_id) {
                Some(edge) => edge,
                None => continue,
            };
            let next = edge.to();
            let next_dist = dist.saturating_add(edge.weight());
            let best = distances.entry(next).or_insert(UNREACHABLE);
            if next_dist < *best {
                *best = next_dist;
                heap.push(Reverse((next_dist, next)));
            }
        }
    }

    distances
}
