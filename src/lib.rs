//! The purpose of this crate is to answer the structural questions a history
//! visualizer asks about a commit graph: which commits are reachable from a
//! commit, through which parent of a merge a distant ancestor is reached,
//! which commits one branch has that another lacks, and which commits belong
//! to a single branch alone.
//!
//! ## The Graph
//!
//! Commits are dense integer ids `0..n`. The algorithms only see the graph
//! through the [`DagView`] trait, which exposes for each node its
//! `down_nodes` (the direction traversals follow, for a history usually the
//! parents) and its `up_nodes` (the inverse). The graph must be acyclic in
//! the down direction. [`AdjacencyGraph`] is a ready-made implementation that
//! rejects edges closing a cycle, built on the compact [`IntIntMultiMap`].
//!
//! Sets of nodes, both results and scratch space, are [`IndexedBoolSet`]s
//! sized to the graph.
//!
//! ## Examples
//!
//! ```
//! use history_dag::{
//!     corresponding_parent, exclusive_nodes, subgraph_difference, walk_down, AdjacencyGraph,
//!     IndexedBoolSet,
//! };
//!
//! // feature: 0 -> 2 -> 4 -> 6 \
//! //                             7 -> 8 -> 9
//! // main:    1 -> 3 -> 5 ------/
//! let graph = AdjacencyGraph::from_edges(
//!     10,
//!     vec![(0, 2), (2, 4), (4, 6), (6, 7), (1, 3), (3, 5), (5, 7), (7, 8), (8, 9)],
//! )
//! .unwrap();
//!
//! let mut reachable = IndexedBoolSet::new(10);
//! walk_down(&graph, 4, &mut reachable);
//! assert_eq!(reachable.iter_ones().collect::<Vec<_>>(), vec![4, 6, 7, 8, 9]);
//!
//! let only_feature = subgraph_difference(&graph, 0, 1);
//! assert_eq!(only_feature.iter_ones().collect::<Vec<_>>(), vec![0, 2, 4, 6]);
//!
//! let heads = [0, 1, 4];
//! let branch = exclusive_nodes(&graph, 0, |node| heads.contains(&node));
//! assert_eq!(branch.iter_ones().collect::<Vec<_>>(), vec![0, 2]);
//!
//! let mut scratch = IndexedBoolSet::new(10);
//! assert_eq!(corresponding_parent(&graph, 2, 9, &mut scratch), Some(4));
//! ```
//!
//! ## Contract Violations
//!
//! Node ids out of range and node sets of the wrong size are programming
//! errors and panic. Only building an [`AdjacencyGraph`] reports recoverable
//! [`Error`]s.
//!
//! [`DagView`]: trait.DagView.html
//! [`AdjacencyGraph`]: struct.AdjacencyGraph.html
//! [`IntIntMultiMap`]: struct.IntIntMultiMap.html
//! [`IndexedBoolSet`]: struct.IndexedBoolSet.html
//! [`Error`]: enum.Error.html

extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate fnv;
extern crate slab;

mod bool_set;
mod dag;
mod graph;
mod multimap;
mod walk;

pub use crate::{
    bool_set::IndexedBoolSet,
    dag::{corresponding_parent, exclusive_nodes, subgraph_difference},
    graph::{AdjacencyGraph, DagView},
    multimap::{IntIntMultiMap, Values},
    walk::{walk, walk_down, walk_up, Bfs, Direction},
};

/// Different types of failures that can occur while building a graph.
#[derive(Fail, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[fail(
        display = "Node {} was not found in a graph of {} nodes",
        node, node_count
    )]
    NodeMissing { node: usize, node_count: usize },
    #[fail(
        display = "Edge {} -> {} would make the graph cyclic",
        from, to
    )]
    CycleDetected { from: usize, to: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
