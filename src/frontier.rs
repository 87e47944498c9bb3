//! Frontier (open list) implementations.
//!
//! Every strategy shares one search loop; what tells them apart is the order
//! in which the [`Frontier`] hands nodes back. Three containers cover all
//! seven strategies:
//! - [`StackFrontier`]: LIFO (depth-first, depth-limited, iterative deepening)
//! - [`QueueFrontier`]: FIFO (breadth-first)
//! - [`PriorityFrontier`]: min-heap on a caller-supplied [`PriorityKey`],
//!   ties broken by insertion order (uniform-cost, greedy, A*)

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::node::{NodeId, SearchNode};

/// Capability set shared by all frontier disciplines.
pub trait Frontier {
    /// Adds a node. `node` is the data behind `id`, available for keying.
    fn push(&mut self, id: NodeId, node: &SearchNode);

    /// Removes the next node according to the discipline.
    fn pop(&mut self) -> Option<NodeId>;

    /// Current number of nodes held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids currently held, in storage order. Used only for tracing.
    fn snapshot(&self) -> Vec<NodeId>;
}

/// Last in, first out.
#[derive(Debug, Default)]
pub struct StackFrontier {
    stack: Vec<NodeId>,
}

impl StackFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for StackFrontier {
    fn push(&mut self, id: NodeId, _node: &SearchNode) {
        self.stack.push(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        self.stack.clone()
    }
}

/// First in, first out.
#[derive(Debug, Default)]
pub struct QueueFrontier {
    queue: VecDeque<NodeId>,
}

impl QueueFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for QueueFrontier {
    fn push(&mut self, id: NodeId, _node: &SearchNode) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        self.queue.iter().copied().collect()
    }
}

/// Ordering key for the priority frontier: lower `primary` first, then lower
/// `secondary`.
///
/// Uniform-cost uses `(g, 0)`, greedy `(h, 0)` and A* `(g + h, depth)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    pub primary: u32,
    pub secondary: u32,
}

/// Heap entry. Field order gives the derived ordering: key, then insertion
/// sequence, so equal keys come out oldest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    key: PriorityKey,
    seq: u64,
    id: NodeId,
}

/// Function computing a node's priority.
pub type KeyFn = Box<dyn Fn(&SearchNode) -> PriorityKey>;

/// Min-priority frontier.
///
/// `BinaryHeap` is a max-heap, so entries are wrapped in `Reverse` to pop the
/// lowest key first.
pub struct PriorityFrontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    key_fn: KeyFn,
    next_seq: u64,
}

impl PriorityFrontier {
    pub fn new(key_fn: KeyFn) -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            key_fn,
            next_seq: 0,
        }
    }
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, id: NodeId, node: &SearchNode) {
        let entry = FrontierEntry {
            key: (self.key_fn)(node),
            seq: self.next_seq,
            id,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(e)| e.id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        self.heap.iter().map(|Reverse(e)| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use crate::node::SearchTree;

    /// Builds a tree with one root and `costs.len()` children, one per cost.
    fn tree_with_costs(costs: &[u32]) -> (SearchTree, Vec<NodeId>) {
        let mut tree = SearchTree::new();
        let root = tree.add_root(Board::solved());
        let t = Board::solved().successors(crate::engine::CostModel::Unit)[0];
        let ids = costs
            .iter()
            .map(|&c| tree.add_child(root, t.board, t.action, c))
            .collect();
        (tree, ids)
    }

    fn drain(frontier: &mut dyn Frontier) -> Vec<NodeId> {
        let mut out = Vec::new();
        while let Some(id) = frontier.pop() {
            out.push(id);
        }
        out
    }

    #[test]
    fn test_stack_is_lifo() {
        let (tree, ids) = tree_with_costs(&[1, 2, 3]);
        let mut frontier = StackFrontier::new();
        for &id in &ids {
            frontier.push(id, tree.get(id));
        }
        assert_eq!(frontier.len(), 3);
        assert_eq!(drain(&mut frontier), vec![ids[2], ids[1], ids[0]]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_queue_is_fifo() {
        let (tree, ids) = tree_with_costs(&[1, 2, 3]);
        let mut frontier = QueueFrontier::new();
        for &id in &ids {
            frontier.push(id, tree.get(id));
        }
        assert_eq!(frontier.snapshot(), ids);
        assert_eq!(drain(&mut frontier), ids);
    }

    #[test]
    fn test_priority_pops_lowest_key_first() {
        let (tree, ids) = tree_with_costs(&[10, 5, 15]);
        let mut frontier = PriorityFrontier::new(Box::new(|n: &SearchNode| PriorityKey {
            primary: n.cost,
            secondary: 0,
        }));
        for &id in &ids {
            frontier.push(id, tree.get(id));
        }
        assert_eq!(drain(&mut frontier), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_priority_ties_broken_by_insertion_order() {
        let (tree, ids) = tree_with_costs(&[4, 4, 4, 1]);
        let mut frontier = PriorityFrontier::new(Box::new(|n: &SearchNode| PriorityKey {
            primary: n.cost,
            secondary: 0,
        }));
        for &id in &ids {
            frontier.push(id, tree.get(id));
        }
        assert_eq!(drain(&mut frontier), vec![ids[3], ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_priority_key_orders_primary_then_secondary() {
        let a = PriorityKey { primary: 1, secondary: 9 };
        let b = PriorityKey { primary: 2, secondary: 0 };
        let c = PriorityKey { primary: 1, secondary: 3 };
        assert!(a < b, "lower primary should sort first");
        assert!(c < a, "lower secondary should sort first on primary tie");
    }
}
