//! Ordered iteration over the leaf chain.

use std::iter::FusedIterator;

use crate::common::NodeId;

use super::arena::NodeArena;
use super::key::Key;

/// Iterator over `(key, &locator)` pairs in ascending key order.
///
/// Starts at the leftmost leaf and follows `next` links, never touching
/// internal nodes. Created by [`BPlusTree::iter`](super::BPlusTree::iter).
pub struct Iter<'a, L> {
    arena: &'a NodeArena<L>,
    leaf: Option<NodeId>,
    position: usize,
    remaining: usize,
}

impl<'a, L> Iter<'a, L> {
    pub(super) fn new(arena: &'a NodeArena<L>, first_leaf: NodeId, len: usize) -> Self {
        Self {
            arena,
            leaf: Some(first_leaf),
            position: 0,
            remaining: len,
        }
    }
}

impl<'a, L> Iterator for Iter<'a, L> {
    type Item = (Key, &'a L);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.arena.leaf(self.leaf?)?;
            if self.position < leaf.len() {
                let item = (leaf.keys[self.position], &leaf.locators[self.position]);
                self.position += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some(item);
            }
            self.leaf = leaf.next;
            self.position = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<L> ExactSizeIterator for Iter<'_, L> {}

impl<L> FusedIterator for Iter<'_, L> {}

#[cfg(test)]
mod tests {
    use crate::index::BPlusTree;

    #[test]
    fn test_iter_empty() {
        let tree: BPlusTree<u32> = BPlusTree::new();
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_iter_follows_leaf_chain_in_order() {
        let mut tree = BPlusTree::with_orders(3, 2).unwrap();
        for key in [50, 10, 40, 20, 30, 60, 5] {
            tree.insert(key, key as u32).unwrap();
        }

        let keys: Vec<f64> = tree.iter().map(|(key, _)| key.value()).collect();
        assert_eq!(keys, vec![5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

        let locators: Vec<u32> = tree.iter().map(|(_, loc)| *loc).collect();
        assert_eq!(locators, vec![5, 10, 20, 30, 40, 50, 60]);
        assert_eq!(tree.iter().len(), 7);
    }
}
