//! Structural invariant checks.
//!
//! Used by tests after every mutation. Any failure here is a bug in the
//! split/borrow/merge code, never a user error.

use crate::common::{Error, NodeId, Result};

use super::key::Key;
use super::node::Node;
use super::tree::BPlusTree;

/// What a subtree walk reports back to its parent.
struct SubtreeInfo {
    leaf_depth: usize,
    key_count: usize,
}

impl<L> BPlusTree<L> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks, for every node:
    /// - keys strictly increasing;
    /// - internal nodes have exactly `keys + 1` children;
    /// - all keys under `children[i]` are `< keys[i]`, and all keys under
    ///   `children[i + 1]` are `>= keys[i]`;
    /// - occupancy within `[ceil(order / 2), order]` (the root is exempt from
    ///   the lower bound);
    /// - every leaf at the same depth.
    ///
    /// And for the whole tree: the leaf chain visits exactly the keys found by
    /// descent, in the same order, and the stored length matches.
    ///
    /// # Errors
    /// Returns `Error::InvariantViolation` describing the first problem found.
    pub fn check_invariants(&self) -> Result<()> {
        let info = self.check_subtree(self.root, None, None, 1)?;

        if info.key_count != self.len() {
            return violation(format!(
                "tree reports {} keys but holds {}",
                self.len(),
                info.key_count
            ));
        }

        let by_descent = self.keys_in_order();
        let by_chain = self.leaf_keys();
        if by_descent != by_chain {
            return violation(format!(
                "leaf chain {:?} disagrees with descent order {:?}",
                by_chain, by_descent
            ));
        }
        Ok(())
    }

    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<Key>,
        upper: Option<Key>,
        depth: usize,
    ) -> Result<SubtreeInfo> {
        let node = self.arena.get(id);
        let keys = node.keys();
        let is_root = id == self.root;

        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return violation(format!("{} keys not strictly increasing: {:?}", id, keys));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if *first < lower {
                return violation(format!("{} key {} below lower bound {}", id, first, lower));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if *last >= upper {
                return violation(format!("{} key {} not below upper bound {}", id, last, upper));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                let (min, max) = (self.config.min_leaf_keys(), self.config.leaf_order);
                if leaf.len() > max || (!is_root && leaf.len() < min) {
                    return violation(format!(
                        "leaf {} holds {} keys, allowed {}..={}",
                        id,
                        leaf.len(),
                        min,
                        max
                    ));
                }
                if leaf.locators.len() != leaf.keys.len() {
                    return violation(format!(
                        "leaf {} has {} keys but {} locators",
                        id,
                        leaf.keys.len(),
                        leaf.locators.len()
                    ));
                }
                Ok(SubtreeInfo {
                    leaf_depth: depth,
                    key_count: leaf.len(),
                })
            }
            Node::Internal(internal) => {
                let children = internal.children.len();
                if children != internal.keys.len() + 1 {
                    return violation(format!(
                        "internal {} has {} keys but {} children",
                        id,
                        internal.keys.len(),
                        children
                    ));
                }
                let (min, max) = if is_root {
                    (2, self.config.internal_order)
                } else {
                    (self.config.min_internal_children(), self.config.internal_order)
                };
                if children > max || children < min {
                    return violation(format!(
                        "internal {} has {} children, allowed {}..={}",
                        id, children, min, max
                    ));
                }

                let mut leaf_depth = None;
                let mut key_count = 0;
                for (i, &child) in internal.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(internal.keys[i - 1]) };
                    let child_upper = internal.keys.get(i).copied().or(upper);
                    let info = self.check_subtree(child, child_lower, child_upper, depth + 1)?;
                    match leaf_depth {
                        None => leaf_depth = Some(info.leaf_depth),
                        Some(expected) if expected != info.leaf_depth => {
                            return violation(format!(
                                "leaves under {} at depths {} and {}",
                                id, expected, info.leaf_depth
                            ));
                        }
                        Some(_) => {}
                    }
                    key_count += info.key_count;
                }
                Ok(SubtreeInfo {
                    leaf_depth: leaf_depth.unwrap_or(depth),
                    key_count,
                })
            }
        }
    }
}

fn violation<T>(message: String) -> Result<T> {
    Err(Error::InvariantViolation(message))
}
