//! Breadth-first reachability.

use crate::{bool_set::IndexedBoolSet, graph::DagView};
use std::collections::VecDeque;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow [`DagView::down_nodes`](trait.DagView.html#tymethod.down_nodes).
    Down,
    /// Follow [`DagView::up_nodes`](trait.DagView.html#tymethod.up_nodes).
    Up,
}

impl Direction {
    fn next_nodes<G: DagView + ?Sized>(self, graph: &G, node: usize) -> Vec<usize> {
        match self {
            Direction::Down => graph.down_nodes(node),
            Direction::Up => graph.up_nodes(node),
        }
    }
}

/// Mark `start` and every node reachable from it in `direction` in
/// `visited`.
///
/// Nodes already marked on entry count as visited and are not expanded
/// again, which lets callers walk several starts into one set or fence off
/// parts of the graph. This includes `start`: if it is already marked the
/// walk does nothing. Every node is queued at most once.
///
/// # Panics
/// If `visited` is not sized to the graph, or `start` is out of range.
pub fn walk<G: DagView + ?Sized>(
    graph: &G,
    start: usize,
    visited: &mut IndexedBoolSet,
    direction: Direction,
) {
    check_scratch(graph, visited);

    if visited.get(start) {
        trace!("{} is already visited", start);
        return;
    }

    let mut queue = VecDeque::new();
    let mut marked = 1;

    visited.set(start, true);
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for next in direction.next_nodes(graph, node) {
            if !visited.get(next) {
                visited.set(next, true);
                queue.push_back(next);
                marked += 1;
            }
        }
    }

    debug!("Walked {:?} from {}, marked {} nodes", direction, start, marked);
}

/// Mark `start` and all of its descendants in `visited`.
///
/// # Examples
/// ```
/// use history_dag::{walk_down, AdjacencyGraph, IndexedBoolSet};
///
/// let graph = AdjacencyGraph::from_edges(4, vec![(0, 1), (1, 2), (3, 2)]).unwrap();
/// let mut visited = IndexedBoolSet::new(4);
/// walk_down(&graph, 0, &mut visited);
///
/// assert_eq!(visited, IndexedBoolSet::from_indices(4, vec![0, 1, 2]));
/// ```
pub fn walk_down<G: DagView + ?Sized>(graph: &G, start: usize, visited: &mut IndexedBoolSet) {
    walk(graph, start, visited, Direction::Down)
}

/// Mark `start` and all of its ancestors in `visited`.
pub fn walk_up<G: DagView + ?Sized>(graph: &G, start: usize, visited: &mut IndexedBoolSet) {
    walk(graph, start, visited, Direction::Up)
}

/// Iterator over the closure of a node in breadth-first order, starting with
/// the node itself. Each node is yielded once.
#[derive(Debug)]
pub struct Bfs<'a, G: ?Sized> {
    graph: &'a G,
    direction: Direction,
    queue: VecDeque<usize>,
    visited: IndexedBoolSet,
}

impl<'a, G: DagView + ?Sized> Bfs<'a, G> {
    pub fn new(graph: &'a G, start: usize, direction: Direction) -> Self {
        let mut visited = IndexedBoolSet::new(graph.node_count());
        visited.set(start, true);

        let mut queue = VecDeque::new();
        queue.push_back(start);

        Bfs {
            graph,
            direction,
            queue,
            visited,
        }
    }
}

impl<'a, G: DagView + ?Sized> Iterator for Bfs<'a, G> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;

        for next in self.direction.next_nodes(self.graph, node) {
            if !self.visited.get(next) {
                self.visited.set(next, true);
                self.queue.push_back(next);
            }
        }

        Some(node)
    }
}

pub(crate) fn check_scratch<G: DagView + ?Sized>(graph: &G, scratch: &IndexedBoolSet) {
    assert_eq!(
        scratch.len(),
        graph.node_count(),
        "node set of size {} used with a graph of {} nodes",
        scratch.len(),
        graph.node_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::AdjacencyGraph, test_util::init_logging};
    use std::cell::RefCell;

    /// Records how often each node's down edges were requested.
    struct CountingView<'a> {
        inner: &'a AdjacencyGraph,
        down_requests: RefCell<Vec<usize>>,
    }

    impl<'a> CountingView<'a> {
        fn new(inner: &'a AdjacencyGraph) -> Self {
            CountingView {
                inner,
                down_requests: RefCell::new(vec![0; inner.node_count()]),
            }
        }
    }

    impl<'a> DagView for CountingView<'a> {
        fn node_count(&self) -> usize {
            self.inner.node_count()
        }

        fn down_nodes(&self, node: usize) -> Vec<usize> {
            self.down_requests.borrow_mut()[node] += 1;
            self.inner.down_nodes(node)
        }

        fn up_nodes(&self, node: usize) -> Vec<usize> {
            self.inner.up_nodes(node)
        }
    }

    fn diamond() -> AdjacencyGraph {
        // 0 -> {1, 2}, 1 -> 3, 2 -> 3, 3 -> 4
        AdjacencyGraph::from_edges(6, vec![(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]).unwrap()
    }

    #[test]
    fn walk_down_marks_closure() {
        init_logging();
        let graph = diamond();
        let mut visited = IndexedBoolSet::new(6);

        walk_down(&graph, 1, &mut visited);

        assert_eq!(visited, IndexedBoolSet::from_indices(6, vec![1, 3, 4]));
    }

    #[test]
    fn walk_is_idempotent() {
        let graph = diamond();

        let mut first = IndexedBoolSet::new(6);
        walk_down(&graph, 0, &mut first);
        let mut second = IndexedBoolSet::new(6);
        walk_down(&graph, 0, &mut second);

        assert_eq!(first, second);
        assert_eq!(first, IndexedBoolSet::from_indices(6, vec![0, 1, 2, 3, 4]));
    }

    #[test]
    fn diamond_expands_merge_once() {
        let graph = diamond();
        let view = CountingView::new(&graph);
        let mut visited = IndexedBoolSet::new(6);

        walk_down(&view, 0, &mut visited);

        assert_eq!(*view.down_requests.borrow(), vec![1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn pre_marked_nodes_are_not_expanded() {
        let graph = diamond();
        let view = CountingView::new(&graph);
        let mut visited = IndexedBoolSet::new(6);
        visited.set(3, true);

        walk_down(&view, 0, &mut visited);

        assert_eq!(visited, IndexedBoolSet::from_indices(6, vec![0, 1, 2, 3]));
        assert_eq!(view.down_requests.borrow()[3], 0);
    }

    #[test]
    fn pre_marked_start_is_not_expanded() {
        let graph = diamond();
        let view = CountingView::new(&graph);
        let mut visited = IndexedBoolSet::new(6);
        visited.set(0, true);

        walk_down(&view, 0, &mut visited);

        assert_eq!(visited, IndexedBoolSet::from_indices(6, vec![0]));
        assert_eq!(*view.down_requests.borrow(), vec![0; 6]);
    }

    #[test]
    fn walks_accumulate_into_one_set() {
        let graph = diamond();
        let mut visited = IndexedBoolSet::new(6);

        walk_down(&graph, 1, &mut visited);
        walk_down(&graph, 2, &mut visited);
        walk_down(&graph, 1, &mut visited);

        assert_eq!(visited, IndexedBoolSet::from_indices(6, vec![1, 2, 3, 4]));
    }

    #[test]
    fn walk_up_marks_ancestors() {
        let graph = diamond();
        let mut visited = IndexedBoolSet::new(6);

        walk_up(&graph, 3, &mut visited);

        assert_eq!(visited, IndexedBoolSet::from_indices(6, vec![0, 1, 2, 3]));
    }

    #[test]
    fn bfs_yields_each_node_once_in_breadth_order() {
        let graph = diamond();

        let order = Bfs::new(&graph, 0, Direction::Down).collect::<Vec<_>>();

        assert_eq!(order[0], 0);
        let mut middle = order[1..3].to_vec();
        middle.sort_unstable();
        assert_eq!(middle, vec![1, 2]);
        assert_eq!(&order[3..], &[3, 4]);

        let ancestors = Bfs::new(&graph, 4, Direction::Up).count();
        assert_eq!(ancestors, 5);
    }

    #[test]
    #[should_panic(expected = "used with a graph")]
    fn mismatched_scratch_panics() {
        let graph = diamond();
        let mut visited = IndexedBoolSet::new(5);

        walk_down(&graph, 0, &mut visited);
    }
}
