//! The node sum type shared by every tree algorithm.

use super::internal::InternalNode;
use super::key::Key;
use super::leaf::LeafNode;

/// A tree node: either a leaf or an internal router.
///
/// Every place that cares about the node kind matches on this enum, so a new
/// code path cannot silently ignore one of the two cases.
#[derive(Debug, Clone)]
pub(crate) enum Node<L> {
    Leaf(LeafNode<L>),
    Internal(InternalNode),
}

impl<L> Node<L> {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub(crate) fn keys(&self) -> &[Key] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(internal) => &internal.keys,
        }
    }

    /// Occupancy as counted against the order: keys for a leaf, children for
    /// an internal node.
    pub(crate) fn occupancy(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Internal(internal) => internal.children.len(),
        }
    }
}

/// A record removed from the index, handed back to the caller.
///
/// # Example
/// ```
/// use bplusdb::BPlusTree;
///
/// let mut tree = BPlusTree::new();
/// tree.insert(7, "slot-7").unwrap();
///
/// let deleted = tree.delete(7).unwrap().unwrap();
/// assert_eq!(deleted.key.value(), 7.0);
/// assert_eq!(deleted.locator, "slot-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted<L> {
    /// The key that was removed.
    pub key: Key,
    /// The locator that was stored under it.
    pub locator: L,
}
