//! Underflow repair: borrowing from and merging with siblings.
//!
//! All repairs are driven by the parent of the underflowing node, using the
//! child's index within the parent. Nodes never look upward.
//!
//! # Policy
//! For a child that fell below minimum occupancy:
//! 1. borrow one entry from the right sibling if it has a surplus, else from
//!    the left sibling;
//! 2. otherwise merge with the right sibling, or with the left if the child
//!    is the last one.
//!
//! A leaf that became completely empty skips step 1 and is merged away
//! directly; there is nothing left in it worth keeping as a separate node.
//! In a merge the left node of the pair always survives, so the leaf chain
//! only needs the survivor's `next` updated.

use log::debug;

use crate::common::{Error, NodeId, Result};

use super::internal::InternalNode;
use super::key::Key;
use super::leaf::LeafNode;
use super::node::Node;
use super::step::Step;
use super::tree::BPlusTree;

impl<L> BPlusTree<L> {
    /// Repair `parent.children[index]` after it reported underflow.
    pub(super) fn rebalance_child(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let (child, left, right) = {
            let node = self.internal_node(parent)?;
            (
                node.children[index],
                index.checked_sub(1).map(|i| node.children[i]),
                node.children.get(index + 1).copied(),
            )
        };

        let child_node = self.arena.get(child);
        let min = if child_node.is_leaf() {
            self.config.min_leaf_keys()
        } else {
            self.config.min_internal_children()
        };
        let dissolve = child_node.is_leaf() && child_node.occupancy() == 0;
        let has_surplus = |sibling: Option<NodeId>| {
            sibling.is_some_and(|id| self.arena.get(id).occupancy() > min)
        };
        let right_surplus = !dissolve && has_surplus(right);
        let left_surplus = !dissolve && has_surplus(left);

        if right_surplus {
            self.borrow_from_right(parent, index)
        } else if left_surplus {
            self.borrow_from_left(parent, index)
        } else if right.is_some() {
            self.merge_children(parent, index)
        } else if left.is_some() {
            self.merge_children(parent, index - 1)
        } else {
            Err(Error::InvariantViolation(format!(
                "{} underflowed under {} with no siblings",
                child, parent
            )))
        }
    }

    fn borrow_from_right(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let (child, sibling, separator) = {
            let node = self.internal_node(parent)?;
            (node.children[index], node.children[index + 1], node.keys[index])
        };

        let new_separator = match self.arena.pair_mut(child, sibling) {
            (Node::Leaf(node), Node::Leaf(right)) => node.borrow_from_right(right),
            (Node::Internal(node), Node::Internal(right)) => node.borrow_from_right(right, separator),
            _ => None,
        }
        .ok_or_else(|| {
            Error::InvariantViolation(format!("cannot borrow into {} from {}", child, sibling))
        })?;

        self.internal_node_mut(parent)?.keys[index] = new_separator;
        debug!(
            "borrow right: {} <- {} (separator {} -> {})",
            child, sibling, separator, new_separator
        );
        self.record(Step::BorrowRight {
            node: child,
            sibling,
            separator: new_separator,
        });
        Ok(())
    }

    fn borrow_from_left(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let (sibling, child, separator) = {
            let node = self.internal_node(parent)?;
            (node.children[index - 1], node.children[index], node.keys[index - 1])
        };

        let new_separator = match self.arena.pair_mut(child, sibling) {
            (Node::Leaf(node), Node::Leaf(left)) => node.borrow_from_left(left),
            (Node::Internal(node), Node::Internal(left)) => node.borrow_from_left(left, separator),
            _ => None,
        }
        .ok_or_else(|| {
            Error::InvariantViolation(format!("cannot borrow into {} from {}", child, sibling))
        })?;

        self.internal_node_mut(parent)?.keys[index - 1] = new_separator;
        debug!(
            "borrow left: {} <- {} (separator {} -> {})",
            child, sibling, separator, new_separator
        );
        self.record(Step::BorrowLeft {
            node: child,
            sibling,
            separator: new_separator,
        });
        Ok(())
    }

    /// Merge `children[left_index + 1]` into `children[left_index]`.
    ///
    /// The parent loses the separator between them and the absorbed slot.
    fn merge_children(&mut self, parent: NodeId, left_index: usize) -> Result<()> {
        let (survivor, absorbed, separator) = {
            let node = self.internal_node(parent)?;
            (
                node.children[left_index],
                node.children[left_index + 1],
                node.keys[left_index],
            )
        };

        let right = self.arena.release(absorbed);
        match (self.arena.get_mut(survivor), right) {
            (Node::Leaf(left), Node::Leaf(right)) => left.absorb(right),
            (Node::Internal(left), Node::Internal(right)) => left.absorb(separator, right),
            _ => {
                return Err(Error::InvariantViolation(format!(
                    "cannot merge {} into {}: mismatched node kinds",
                    absorbed, survivor
                )));
            }
        }

        let node = self.internal_node_mut(parent)?;
        node.keys.remove(left_index);
        node.children.remove(left_index + 1);

        debug!("merge: {} absorbed {} (separator {})", survivor, absorbed, separator);
        self.record(Step::Merge { survivor, absorbed });
        Ok(())
    }

    /// Replace a separator equal to the just-deleted key with the smallest key
    /// of the subtree to its right, or drop it when no such subtree exists.
    pub(super) fn replace_separator(&mut self, id: NodeId, deleted: &Key) -> Result<()> {
        let (position, right) = {
            let node = self.internal_node(id)?;
            match node.keys.binary_search(deleted) {
                Ok(position) => (position, node.children.get(position + 1).copied()),
                Err(_) => return Ok(()),
            }
        };

        let Some(right) = right else {
            self.internal_node_mut(id)?.keys.remove(position);
            return Ok(());
        };

        let successor = self.min_key(right).ok_or_else(|| {
            Error::InvariantViolation(format!("empty subtree {} right of separator {}", right, deleted))
        })?;
        self.internal_node_mut(id)?.keys[position] = successor;
        self.record(Step::ReplaceSeparator {
            node: id,
            old: *deleted,
            new: successor,
        });
        Ok(())
    }

    /// Smallest key stored under `id`.
    pub(super) fn min_key(&self, mut id: NodeId) -> Option<Key> {
        loop {
            match self.arena.get(id) {
                Node::Leaf(leaf) => return leaf.first_key(),
                Node::Internal(internal) => id = *internal.children.first()?,
            }
        }
    }

    pub(super) fn internal_node(&self, id: NodeId) -> Result<&InternalNode> {
        self.arena
            .internal(id)
            .ok_or_else(|| Error::InvariantViolation(format!("{} is not an internal node", id)))
    }

    pub(super) fn internal_node_mut(&mut self, id: NodeId) -> Result<&mut InternalNode> {
        self.arena
            .internal_mut(id)
            .ok_or_else(|| Error::InvariantViolation(format!("{} is not an internal node", id)))
    }

    pub(super) fn leaf_node_mut(&mut self, id: NodeId) -> Result<&mut LeafNode<L>> {
        self.arena
            .leaf_mut(id)
            .ok_or_else(|| Error::InvariantViolation(format!("{} is not a leaf node", id)))
    }
}

#[cfg(test)]
mod tests {
    use crate::common::IndexConfig;
    use crate::index::{BPlusTree, Key, Step};

    fn k(v: f64) -> Key {
        Key::new(v).unwrap()
    }

    fn traced(internal: usize, leaf: usize, keys: &[i64]) -> BPlusTree<i64> {
        let config = IndexConfig::new(internal, leaf)
            .unwrap()
            .with_step_recording(true);
        let mut tree = BPlusTree::with_config(config).unwrap();
        for &key in keys {
            tree.insert(key, key).unwrap();
        }
        tree.take_steps();
        tree
    }

    fn leaf_levels(tree: &BPlusTree<i64>) -> Vec<Vec<f64>> {
        let snapshot = tree.snapshot();
        snapshot
            .levels
            .last()
            .unwrap()
            .iter()
            .map(|node| node.keys().iter().map(Key::value).collect())
            .collect()
    }

    #[test]
    fn test_leaf_borrow_from_right() {
        // leaves {1,2} {3,4,5} under root [3]
        let mut tree = traced(3, 3, &[1, 2, 3, 4, 5]);
        assert_eq!(leaf_levels(&tree), vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]]);

        tree.delete(1).unwrap();

        assert_eq!(leaf_levels(&tree), vec![vec![2.0, 3.0], vec![4.0, 5.0]]);
        let steps = tree.take_steps();
        assert!(steps
            .iter()
            .any(|s| matches!(s, Step::BorrowRight { separator, .. } if *separator == k(4.0))));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_leaf_borrow_from_left() {
        // leaves {1,2} {3,4} -> insert 0 lands left: {0,1,2} {3,4}
        let mut tree = traced(3, 3, &[1, 2, 3, 4, 5]);
        tree.delete(5).unwrap();
        tree.insert(0, 0).unwrap();
        assert_eq!(leaf_levels(&tree), vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0]]);
        tree.take_steps();

        tree.delete(4).unwrap();

        assert_eq!(leaf_levels(&tree), vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
        let steps = tree.take_steps();
        assert!(steps
            .iter()
            .any(|s| matches!(s, Step::BorrowLeft { separator, .. } if *separator == k(2.0))));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_leaf_merge_with_right() {
        // leaves {1,2} {3,4}: no surplus anywhere
        let mut tree = traced(3, 3, &[1, 2, 3, 4, 5]);
        tree.delete(5).unwrap();
        tree.take_steps();

        tree.delete(1).unwrap();

        assert!(tree.root_is_leaf());
        assert_eq!(leaf_levels(&tree), vec![vec![2.0, 3.0, 4.0]]);
        let steps = tree.take_steps();
        assert!(steps.iter().any(|s| matches!(s, Step::Merge { .. })));
        assert!(steps.iter().any(|s| matches!(s, Step::CollapseRoot { height: 1, .. })));
    }

    #[test]
    fn test_leaf_merge_with_left_when_last_child() {
        let mut tree = traced(3, 3, &[1, 2, 3, 4, 5]);
        tree.delete(5).unwrap();

        tree.delete(4).unwrap();

        assert_eq!(leaf_levels(&tree), vec![vec![1.0, 2.0, 3.0]]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_empty_leaf_is_merged_not_refilled() {
        let mut tree = traced(3, 2, &[5, 10, 20]);

        tree.delete(5).unwrap();

        assert!(tree.root_is_leaf());
        assert_eq!(leaf_levels(&tree), vec![vec![10.0, 20.0]]);
        let steps = tree.take_steps();
        assert!(!steps
            .iter()
            .any(|s| matches!(s, Step::BorrowLeft { .. } | Step::BorrowRight { .. })));
    }

    #[test]
    fn test_separator_replaced_with_successor() {
        // root [3] over {1,2} {3,4,5}; deleting 3 leaves 4 as the successor
        let mut tree = traced(3, 3, &[1, 2, 3, 4, 5]);

        tree.delete(3).unwrap();

        let snapshot = tree.snapshot();
        assert_eq!(snapshot.levels[0][0].keys(), &[k(4.0)]);
        let steps = tree.take_steps();
        assert!(steps.contains(&Step::ReplaceSeparator {
            node: tree.root_id(),
            old: k(3.0),
            new: k(4.0),
        }));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_internal_merge_cascades_to_root() {
        let mut tree = traced(3, 2, &[]);
        for key in 1..=8 {
            tree.insert(key, key).unwrap();
        }
        assert!(tree.height() >= 3);

        for key in 1..=7 {
            tree.delete(key).unwrap();
            tree.check_invariants().unwrap();
        }

        assert_eq!(tree.len(), 1);
        assert!(tree.root_is_leaf());
        assert_eq!(tree.search(8).unwrap(), Some(&8));
    }

    #[test]
    fn test_internal_borrow_from_right() {
        // T[3,5] over R[2](A,B) R2[4](C,D) R3[6,7](E,F,G)
        let mut tree = traced(3, 2, &[1, 2, 3, 4, 5, 6, 7, 8]);
        tree.delete(1).unwrap();
        tree.delete(2).unwrap();
        tree.take_steps();

        tree.delete(3).unwrap();

        let steps = tree.take_steps();
        assert!(steps
            .iter()
            .any(|s| matches!(s, Step::BorrowRight { separator, .. } if *separator == k(6.0))));
        assert_eq!(tree.snapshot().levels[0][0].keys(), &[k(6.0)]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_internal_borrow_from_left() {
        let mut tree = traced(3, 2, &[8, 7, 6, 5, 4, 3, 2, 1, 0]);
        tree.delete(8).unwrap();
        tree.take_steps();

        tree.delete(7).unwrap();

        let steps = tree.take_steps();
        assert!(steps
            .iter()
            .any(|s| matches!(s, Step::BorrowLeft { separator, .. } if *separator == k(3.0))));
        assert_eq!(tree.snapshot().levels[0][0].keys(), &[k(3.0)]);
        assert_eq!(tree.height(), 3);
        tree.check_invariants().unwrap();
    }
}
