//! The read interface every algorithm consumes, and an in-memory
//! implementation of it.

use crate::{bool_set::IndexedBoolSet, multimap::IntIntMultiMap, Error, Result};
use std::convert::TryFrom;

/// Minimal read-only view of a directed acyclic graph over the dense node ids
/// `0..node_count()`.
///
/// `down_nodes` are the successors of a node in traversal direction (for a
/// commit history: its parents), `up_nodes` the inverse edges. Implementors
/// must keep the two symmetric: `m` is in `down_nodes(n)` exactly as many
/// times as `n` is in `up_nodes(m)`. The down direction must be acyclic; the
/// algorithms of this crate do not detect cycles.
pub trait DagView {
    fn node_count(&self) -> usize;

    fn down_nodes(&self, node: usize) -> Vec<usize>;

    fn up_nodes(&self, node: usize) -> Vec<usize>;
}

impl<'a, G: DagView + ?Sized> DagView for &'a G {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn down_nodes(&self, node: usize) -> Vec<usize> {
        (**self).down_nodes(node)
    }

    fn up_nodes(&self, node: usize) -> Vec<usize> {
        (**self).up_nodes(node)
    }
}

/// A [`DagView`] backed by two [`IntIntMultiMap`]s, one per edge direction.
///
/// Edges are only accepted if they keep the graph acyclic. Parallel edges are
/// kept as separate occurrences.
///
/// # Examples
/// ```
/// use history_dag::{AdjacencyGraph, DagView};
///
/// let mut graph = AdjacencyGraph::with_nodes(3);
/// graph.add_edge(0, 1).unwrap();
/// graph.add_edge(1, 2).unwrap();
///
/// assert!(graph.add_edge(2, 0).is_err());
/// assert_eq!(graph.down_nodes(0), vec![1]);
/// assert_eq!(graph.up_nodes(2), vec![1]);
/// ```
///
/// [`DagView`]: trait.DagView.html
/// [`IntIntMultiMap`]: struct.IntIntMultiMap.html
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    down: IntIntMultiMap,
    up: IntIntMultiMap,
    node_count: usize,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        AdjacencyGraph::default()
    }

    /// Create a graph of `node_count` nodes and no edges.
    pub fn with_nodes(node_count: usize) -> Self {
        assert!(
            u32::try_from(node_count).is_ok(),
            "{} nodes do not fit into u32 ids",
            node_count
        );

        AdjacencyGraph {
            node_count,
            ..AdjacencyGraph::default()
        }
    }

    /// Build a graph of `node_count` nodes from `(from, to)` pairs.
    ///
    /// # Errors
    /// Fails on the first edge that references a missing node or would
    /// introduce a cycle.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = AdjacencyGraph::with_nodes(node_count);
        for (from, to) in edges {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Append a node without edges and return its id.
    pub fn add_node(&mut self) -> usize {
        let node = self.node_count;
        assert!(u32::try_from(node).is_ok(), "node ids are exhausted");
        self.node_count += 1;
        node
    }

    /// Add an edge pointing down from `from` to `to`.
    ///
    /// # Errors
    /// Returns [`Error::NodeMissing`] if either endpoint is not in the graph,
    /// and [`Error::CycleDetected`] if `from` is already reachable from `to`,
    /// which includes `from == to`.
    ///
    /// [`Error::NodeMissing`]: enum.Error.html#variant.NodeMissing
    /// [`Error::CycleDetected`]: enum.Error.html#variant.CycleDetected
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;

        if self.reaches(to, from) {
            trace!("Rejected edge {} -> {}, it closes a cycle", from, to);
            return Err(Error::CycleDetected { from, to });
        }

        self.down.put_value(from as u32, to as u32);
        self.up.put_value(to as u32, from as u32);
        self.edge_count += 1;

        info!("Added edge {} -> {}", from, to);

        Ok(())
    }

    /// Remove one occurrence of the edge `from -> to`, returning true if it
    /// was present.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> bool {
        if from >= self.node_count || to >= self.node_count {
            return false;
        }

        if !self.down.remove(from as u32, to as u32) {
            return false;
        }
        self.up.remove(to as u32, from as u32);
        self.edge_count -= 1;

        info!("Removed edge {} -> {}", from, to);

        true
    }

    /// Returns true if there is at least one edge `from -> to`.
    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        from < self.node_count
            && to < self.node_count
            && self.down.get(from as u32).any(|node| node as usize == to)
    }

    /// Returns true if `to` is `from` or one of its descendants.
    ///
    /// Out-of-range nodes reach nothing.
    pub fn reaches(&self, from: usize, to: usize) -> bool {
        if from >= self.node_count || to >= self.node_count {
            return false;
        }

        if from == to {
            return true;
        }

        // Depth first is enough here, the order of visits does not matter.
        let mut stack = vec![from as u32];
        let mut visited = IndexedBoolSet::new(self.node_count);
        visited.set(from, true);

        while let Some(node) = stack.pop() {
            for child in self.down.get(node) {
                if child as usize == to {
                    return true;
                }
                if !visited.get(child as usize) {
                    visited.set(child as usize, true);
                    stack.push(child);
                }
            }
        }

        false
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Return true if there are no nodes in the graph.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node < self.node_count {
            Ok(())
        } else {
            Err(Error::NodeMissing {
                node,
                node_count: self.node_count,
            })
        }
    }

    fn neighbors(&self, map: &IntIntMultiMap, node: usize) -> Vec<usize> {
        assert!(
            node < self.node_count,
            "node {} is not in a graph of {} nodes",
            node,
            self.node_count
        );
        map.get(node as u32).map(|n| n as usize).collect()
    }
}

impl DagView for AdjacencyGraph {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn down_nodes(&self, node: usize) -> Vec<usize> {
        self.neighbors(&self.down, node)
    }

    fn up_nodes(&self, node: usize) -> Vec<usize> {
        self.neighbors(&self.up, node)
    }
}
