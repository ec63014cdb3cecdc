//! Structural change log for visualization and debugging.

use serde::Serialize;

use crate::common::NodeId;

use super::key::Key;

/// One structural event produced by an insert or delete.
///
/// Steps are only collected when
/// [`IndexConfig::record_steps`](crate::common::IndexConfig) is set; drain them
/// with [`BPlusTree::take_steps`](super::BPlusTree::take_steps). They are
/// emitted in the order the changes happened, bottom-up for cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// A new key was placed in a leaf at `index`.
    InsertLeaf { leaf: NodeId, key: Key, index: usize },
    /// An existing key received a new locator.
    UpdateLeaf { leaf: NodeId, key: Key },
    /// A leaf overflowed; `promoted` is the first key of `right`.
    SplitLeaf {
        left: NodeId,
        right: NodeId,
        promoted: Key,
    },
    /// An internal node overflowed; `promoted` moved up and out of both halves.
    SplitInternal {
        left: NodeId,
        right: NodeId,
        promoted: Key,
    },
    /// The root split and the tree grew one level.
    NewRoot { root: NodeId, height: usize },
    /// A key was removed from a leaf.
    DeleteLeaf { leaf: NodeId, key: Key },
    /// `node` took one entry from its left sibling; `separator` is the new
    /// parent key between them.
    BorrowLeft {
        node: NodeId,
        sibling: NodeId,
        separator: Key,
    },
    /// `node` took one entry from its right sibling.
    BorrowRight {
        node: NodeId,
        sibling: NodeId,
        separator: Key,
    },
    /// `absorbed` was folded into its left neighbour `survivor`.
    Merge { survivor: NodeId, absorbed: NodeId },
    /// A separator naming the deleted key was replaced by its successor.
    ReplaceSeparator { node: NodeId, old: Key, new: Key },
    /// The root lost its last separator and the tree shrank one level.
    CollapseRoot { root: NodeId, height: usize },
    /// The key to delete was not in the tree.
    NotFound { key: Key },
}
