//! Slot arena that owns every node of a tree.
//!
//! Nodes refer to each other by [`NodeId`] (children, leaf `next` links), and
//! the arena is the single owner of the node values. Freed slots are recycled
//! so ids stay small.

use crate::common::NodeId;

use super::internal::InternalNode;
use super::leaf::LeafNode;
use super::node::Node;

#[derive(Debug, Clone)]
pub(crate) struct NodeArena<L> {
    slots: Vec<Option<Node<L>>>,
    free: Vec<NodeId>,
}

impl<L> NodeArena<L> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a node and return its id.
    pub(crate) fn alloc(&mut self, node: Node<L>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            return id;
        }
        let id = NodeId::new(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    /// Remove a node from the arena, handing ownership to the caller.
    ///
    /// # Panics
    /// Panics if `id` does not name a live node.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<L> {
        match self.slots.get_mut(id.index()).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("release of dangling {}", id),
        }
    }

    /// # Panics
    /// Panics if `id` does not name a live node.
    pub(crate) fn get(&self, id: NodeId) -> &Node<L> {
        match self.slots.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling {}", id),
        }
    }

    /// # Panics
    /// Panics if `id` does not name a live node.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<L> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling {}", id),
        }
    }

    pub(crate) fn leaf(&self, id: NodeId) -> Option<&LeafNode<L>> {
        match self.get(id) {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Option<&mut LeafNode<L>> {
        match self.get_mut(id) {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub(crate) fn internal(&self, id: NodeId) -> Option<&InternalNode> {
        match self.get(id) {
            Node::Internal(internal) => Some(internal),
            Node::Leaf(_) => None,
        }
    }

    pub(crate) fn internal_mut(&mut self, id: NodeId) -> Option<&mut InternalNode> {
        match self.get_mut(id) {
            Node::Internal(internal) => Some(internal),
            Node::Leaf(_) => None,
        }
    }

    /// Mutable access to two distinct nodes at once (e.g. adjacent siblings).
    ///
    /// # Panics
    /// Panics if `a == b` or either id is dangling.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<L>, &mut Node<L>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi.index());
        let (first, second) = match (head.get_mut(lo.index()), tail.first_mut()) {
            (Some(Some(first)), Some(Some(second))) => (first, second),
            _ => panic!("dangling {} or {}", lo, hi),
        };
        if a < b {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
