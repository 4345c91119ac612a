//! Set algorithms over the closures of history nodes: which branch of a
//! merge leads to a node, what one branch has that another lacks, and which
//! nodes belong to a branch alone.

use crate::{
    bool_set::IndexedBoolSet,
    graph::DagView,
    walk::{check_scratch, walk_down},
};
use fnv::FnvHashMap;
use std::collections::VecDeque;

/// Find the down-neighbor of `start` through which `end` is reached.
///
/// If `end` is a down-neighbor of `start` it is returned as is. Otherwise a
/// breadth-first search is seeded with all down-neighbors of `start` at once,
/// in `down_nodes` order, and every discovered node inherits the label of
/// the node it was first reached from. Labels are never overwritten, so when
/// several down-neighbors lead to `end` the one whose search gets there first
/// wins.
///
/// `visited` is scratch space sized to the graph. It is cleared on entry, so
/// one set can be reused across calls; its contents afterwards are
/// unspecified. Returns `None` if `end` is not reachable from `start`.
///
/// # Examples
/// ```
/// use history_dag::{corresponding_parent, AdjacencyGraph, IndexedBoolSet};
///
/// // 0 -> {1, 2}, 1 -> 3, 2 -> {3, 4}
/// let graph = AdjacencyGraph::from_edges(5, vec![(0, 1), (0, 2), (1, 3), (2, 3), (2, 4)]).unwrap();
/// let mut visited = IndexedBoolSet::new(5);
///
/// assert_eq!(corresponding_parent(&graph, 0, 4, &mut visited), Some(2));
/// ```
///
/// # Panics
/// If `visited` is not sized to the graph, or a node is out of range.
pub fn corresponding_parent<G: DagView + ?Sized>(
    graph: &G,
    start: usize,
    end: usize,
    visited: &mut IndexedBoolSet,
) -> Option<usize> {
    check_scratch(graph, visited);
    visited.clear();

    let down_nodes = graph.down_nodes(start);
    if down_nodes.contains(&end) {
        trace!("{} is a direct down-neighbor of {}", end, start);
        return Some(end);
    }

    // (node, down-neighbor of `start` it was first reached from)
    let mut queue = VecDeque::with_capacity(down_nodes.len());
    for &down in &down_nodes {
        if !visited.get(down) {
            visited.set(down, true);
            queue.push_back((down, down));
        }
    }

    while let Some((node, label)) = queue.pop_front() {
        for next in graph.down_nodes(node) {
            if visited.get(next) {
                continue;
            }
            if next == end {
                debug!("Resolved {} to down-neighbor {} of {}", end, label, start);
                return Some(label);
            }
            visited.set(next, true);
            queue.push_back((next, label));
        }
    }

    debug!("{} is not reachable from {}", end, start);
    None
}

/// Collect the nodes reachable from `node1` but not from `node2`.
///
/// Both closures include their start node. The search from `node1` stops at
/// the first node it meets inside the closure of `node2`, since everything
/// below such a node is inside that closure as well.
///
/// # Examples
/// ```
/// use history_dag::{subgraph_difference, AdjacencyGraph};
///
/// // 0 -> 2 -> 3, 1 -> 3
/// let graph = AdjacencyGraph::from_edges(4, vec![(0, 2), (2, 3), (1, 3)]).unwrap();
///
/// let only_in_0 = subgraph_difference(&graph, 0, 1);
/// assert_eq!(only_in_0.iter_ones().collect::<Vec<_>>(), vec![0, 2]);
/// ```
///
/// # Panics
/// If either node is out of range.
pub fn subgraph_difference<G: DagView + ?Sized>(
    graph: &G,
    node1: usize,
    node2: usize,
) -> IndexedBoolSet {
    let node_count = graph.node_count();

    let mut excluded = IndexedBoolSet::new(node_count);
    walk_down(graph, node2, &mut excluded);

    let mut result = IndexedBoolSet::new(node_count);
    if excluded.get(node1) {
        debug!("Closure of {} lies within closure of {}", node1, node2);
        return result;
    }

    // `excluded` doubles as the visited set of the search from `node1`:
    // anything marked is either in the closure of `node2` or already found.
    let mut queue = VecDeque::new();
    excluded.set(node1, true);
    result.set(node1, true);
    queue.push_back(node1);

    while let Some(node) = queue.pop_front() {
        for next in graph.down_nodes(node) {
            if !excluded.get(next) {
                excluded.set(next, true);
                result.set(next, true);
                queue.push_back(next);
            }
        }
    }

    debug!(
        "Difference of {} and {} has {} nodes",
        node1,
        node2,
        result.count_ones()
    );
    result
}

/// Collect the nodes that belong to the branch of `start` alone.
///
/// `start` is always part of the result. Any other node is part of it if it
/// is not flagged by `other_heads` and every one of its up-neighbors is part
/// of it. A node is only decided once all of its up-neighbors have been, so
/// merges with a parent outside the branch end the branch there, and so
/// does every node flagged as another head.
///
/// # Examples
/// ```
/// use history_dag::{exclusive_nodes, AdjacencyGraph};
///
/// // 0 -> 2 -> 4, 1 -> 3 -> 4
/// let graph = AdjacencyGraph::from_edges(5, vec![(0, 2), (2, 4), (1, 3), (3, 4)]).unwrap();
///
/// let branch = exclusive_nodes(&graph, 0, |_| false);
/// assert_eq!(branch.iter_ones().collect::<Vec<_>>(), vec![0, 2]);
///
/// let branch = exclusive_nodes(&graph, 0, |node| node == 2);
/// assert_eq!(branch.iter_ones().collect::<Vec<_>>(), vec![0]);
/// ```
///
/// # Panics
/// If `start` is out of range.
pub fn exclusive_nodes<G, F>(graph: &G, start: usize, other_heads: F) -> IndexedBoolSet
where
    G: DagView + ?Sized,
    F: Fn(usize) -> bool,
{
    let mut included = IndexedBoolSet::new(graph.node_count());
    // (included up-neighbors seen so far, total up-neighbors) per candidate.
    let mut included_parents: FnvHashMap<usize, (usize, usize)> = FnvHashMap::default();
    let mut queue = VecDeque::new();

    included.set(start, true);
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for next in graph.down_nodes(node) {
            let (seen, total) = included_parents
                .entry(next)
                .or_insert_with(|| (0, graph.up_nodes(next).len()));
            *seen += 1;

            // Only the last included up-neighbor decides; until then some
            // up-neighbor is still undecided or outside the branch.
            if *seen < *total {
                continue;
            }
            included_parents.remove(&next);

            if other_heads(next) {
                trace!("{} is flagged as another head", next);
                continue;
            }
            included.set(next, true);
            queue.push_back(next);
        }
    }

    debug!(
        "Branch of {} has {} exclusive nodes",
        start,
        included.count_ones()
    );
    included
}
