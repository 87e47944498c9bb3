//! Search nodes and the per-search node arena.
//!
//! Nodes are never mutated once created. Every node is pushed into a
//! [`SearchTree`] and referred to by its [`NodeId`]; a node's parent link is
//! the id of the node it was expanded from. Parent ids always point at
//! earlier nodes, so the links form a tree and the whole tree is released
//! when the search that built it is dropped.

use crate::engine::{Board, Move};

/// Index of a node inside its [`SearchTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A board plus how the search reached it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// The board at this node.
    pub state: Board,
    /// The node this one was generated from (`None` for the root).
    pub parent: Option<NodeId>,
    /// The move that produced `state` from the parent's state.
    pub action: Option<Move>,
    /// Cumulative path cost g(n).
    pub cost: u32,
    /// Number of moves from the root.
    pub depth: u32,
}

impl SearchNode {
    pub fn root(state: Board) -> Self {
        SearchNode {
            state,
            parent: None,
            action: None,
            cost: 0,
            depth: 0,
        }
    }
}

/// Arena holding every node created during one search.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        SearchTree { nodes: Vec::new() }
    }

    /// Adds the root node for `state` and returns its id.
    pub fn add_root(&mut self, state: Board) -> NodeId {
        self.push(SearchNode::root(state))
    }

    /// Adds a child of `parent` reached by `action` at an extra `step_cost`.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, state: Board, action: Move, step_cost: u32) -> NodeId {
        let (cost, depth) = {
            let p = &self.nodes[parent.0];
            (p.cost + step_cost, p.depth + 1)
        };
        self.push(SearchNode {
            state,
            parent: Some(parent),
            action: Some(action),
            cost,
            depth,
        })
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Total number of nodes ever created in this tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `id` back to the root and returns the actions
    /// in move order, start to `id`.
    ///
    /// The result always has exactly `get(id).depth` entries.
    pub fn reconstruct(&self, id: NodeId) -> Vec<Move> {
        let mut actions = Vec::with_capacity(self.get(id).depth as usize);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            if let Some(action) = node.action {
                actions.push(action);
            }
            current = node.parent;
        }
        actions.reverse();
        actions
    }
}
