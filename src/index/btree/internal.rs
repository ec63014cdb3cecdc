//! Internal (routing) nodes.

use crate::common::NodeId;

use super::key::Key;

/// An internal node: `keys.len()` separators and `keys.len() + 1` children.
///
/// Every key under `children[i]` is `< keys[i]`, and every key under
/// `children[i + 1]` is `>= keys[i]`.
#[derive(Debug, Clone)]
pub(crate) struct InternalNode {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
}

impl InternalNode {
    /// A new root over a just-split pair of nodes.
    pub(crate) fn with_children(left: NodeId, separator: Key, right: NodeId) -> Self {
        Self {
            keys: vec![separator],
            children: vec![left, right],
        }
    }

    /// Index of the child whose range contains `key`.
    ///
    /// Advances past every separator `<= key`, so a key equal to a separator
    /// routes right, matching the right-biased leaf split.
    #[inline]
    pub(crate) fn child_index(&self, key: &Key) -> usize {
        self.keys.partition_point(|separator| separator <= key)
    }

    /// Install a split child's promoted key and new right sibling.
    ///
    /// `index` is the position of the child that split.
    pub(crate) fn insert_child(&mut self, index: usize, separator: Key, right: NodeId) {
        self.keys.insert(index, separator);
        self.children.insert(index + 1, right);
    }

    /// Split around the middle separator.
    ///
    /// `keys[len / 2]` is promoted and kept in neither half.
    pub(crate) fn split(&mut self) -> (Key, InternalNode) {
        let mid = self.keys.len() / 2;
        let right = InternalNode {
            keys: self.keys.split_off(mid + 1),
            children: self.children.split_off(mid + 1),
        };
        let promoted = self.keys.remove(mid);
        (promoted, right)
    }

    /// Rotate the left sibling's last child through the parent separator.
    ///
    /// `separator` is the parent key between the two nodes; the returned key
    /// replaces it.
    pub(crate) fn borrow_from_left(&mut self, left: &mut InternalNode, separator: Key) -> Option<Key> {
        let child = left.children.pop()?;
        let new_separator = left.keys.pop()?;
        self.keys.insert(0, separator);
        self.children.insert(0, child);
        Some(new_separator)
    }

    /// Rotate the right sibling's first child through the parent separator.
    pub(crate) fn borrow_from_right(&mut self, right: &mut InternalNode, separator: Key) -> Option<Key> {
        if right.keys.is_empty() {
            return None;
        }
        let new_separator = right.keys.remove(0);
        self.keys.push(separator);
        self.children.push(right.children.remove(0));
        Some(new_separator)
    }

    /// Pull the parent separator down and append the right sibling.
    pub(crate) fn absorb(&mut self, separator: Key, right: InternalNode) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}
