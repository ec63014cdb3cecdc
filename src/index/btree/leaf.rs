//! Leaf nodes: the only place locators live.

use crate::common::NodeId;

use super::key::Key;

/// Outcome of inserting into a single leaf.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LeafInsert<L> {
    /// A new entry was placed at this position.
    Inserted(usize),
    /// The key already existed; its old locator is returned.
    Replaced(L),
}

/// A leaf holding sorted keys and their parallel locators.
///
/// `keys[i]` is paired with `locators[i]`. `next` links to the leaf holding
/// the following key range, forming the chain used for ordered full scans.
#[derive(Debug, Clone)]
pub(crate) struct LeafNode<L> {
    pub(crate) keys: Vec<Key>,
    pub(crate) locators: Vec<L>,
    pub(crate) next: Option<NodeId>,
}

impl<L> LeafNode<L> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            locators: Vec::new(),
            next: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Insert a pair, overwriting the locator if the key is already present.
    pub(crate) fn insert(&mut self, key: Key, locator: L) -> LeafInsert<L> {
        match self.keys.binary_search(&key) {
            Ok(index) => LeafInsert::Replaced(std::mem::replace(&mut self.locators[index], locator)),
            Err(index) => {
                self.keys.insert(index, key);
                self.locators.insert(index, locator);
                LeafInsert::Inserted(index)
            }
        }
    }

    /// Split off the upper half into a new right sibling.
    ///
    /// Entries from `len / 2` onward move right, and the sibling's first key is
    /// returned as the separator to promote. The separator stays in the right
    /// leaf. The sibling inherits this leaf's `next`; the caller must point
    /// `self.next` at the sibling once it has an id.
    pub(crate) fn split(&mut self) -> (Key, LeafNode<L>) {
        let mid = self.keys.len() / 2;
        let right = LeafNode {
            keys: self.keys.split_off(mid),
            locators: self.locators.split_off(mid),
            next: self.next.take(),
        };
        (right.keys[0], right)
    }

    /// Remove `key`, returning its locator.
    pub(crate) fn remove(&mut self, key: &Key) -> Option<L> {
        let index = self.keys.binary_search(key).ok()?;
        self.keys.remove(index);
        Some(self.locators.remove(index))
    }

    pub(crate) fn search(&self, key: &Key) -> Option<&L> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.locators[index])
    }

    #[inline]
    pub(crate) fn first_key(&self) -> Option<Key> {
        self.keys.first().copied()
    }

    /// Take the last entry of the left sibling.
    ///
    /// Returns the new separator between the two leaves (this leaf's first
    /// key), or `None` if the sibling was empty.
    pub(crate) fn borrow_from_left(&mut self, left: &mut LeafNode<L>) -> Option<Key> {
        let key = left.keys.pop()?;
        let locator = left.locators.pop()?;
        self.keys.insert(0, key);
        self.locators.insert(0, locator);
        Some(key)
    }

    /// Take the first entry of the right sibling.
    ///
    /// Returns the new separator between the two leaves (the sibling's new
    /// first key), or `None` if the sibling had fewer than two entries.
    pub(crate) fn borrow_from_right(&mut self, right: &mut LeafNode<L>) -> Option<Key> {
        if right.len() < 2 {
            return None;
        }
        self.keys.push(right.keys.remove(0));
        self.locators.push(right.locators.remove(0));
        right.first_key()
    }

    /// Append every entry of the right sibling and unlink it from the chain.
    pub(crate) fn absorb(&mut self, right: LeafNode<L>) {
        self.keys.extend(right.keys);
        self.locators.extend(right.locators);
        self.next = right.next;
    }
}
