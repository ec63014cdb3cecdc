//! The B+ tree: root ownership, key validation, and the descent algorithms.

use log::debug;

use crate::common::{Error, IndexConfig, NodeId, Result};

use super::arena::NodeArena;
use super::internal::InternalNode;
use super::iter::Iter;
use super::key::{AsKey, Key};
use super::leaf::{LeafInsert, LeafNode};
use super::node::{Deleted, Node};
use super::step::Step;

/// Promotion handed from a node that split to its parent.
struct Split {
    promoted: Key,
    right: NodeId,
}

/// A successful removal bubbling back up the descent path.
struct Removal<L> {
    deleted: Deleted<L>,
    /// The node just returned from is below minimum occupancy.
    underflow: bool,
}

/// An in-memory B+ tree mapping numeric keys to opaque locators.
///
/// # Structure
/// ```text
///                 ┌──────────┐
///                 │   [10]   │        internal: separators + children
///                 └──┬────┬──┘
///            ┌───────┘    └───────┐
///       ┌────▼────┐          ┌────▼─────┐
///       │ 5 → L5  │ ───────▶ │10 → L10  │  leaves: keys + locators,
///       └─────────┘   next   │20 → L20  │  chained in key order
///                            └──────────┘
/// ```
///
/// Internal nodes route with "advance while `key >= separator`", leaves split
/// right-biased (the promoted key stays in the right leaf), and internal
/// nodes promote their middle key without keeping it.
///
/// # Ownership
/// All nodes live in an arena owned by the tree. Parents name children by
/// [`NodeId`]; there are no parent pointers. Rebalancing works on a parent
/// and the index of its underflowing child, discovered during the same
/// descent.
///
/// # Thread Safety
/// `BPlusTree` is **single-threaded**. Mutation takes `&mut self`, so callers
/// that share a tree must serialize access themselves.
///
/// # Example
/// ```
/// use bplusdb::BPlusTree;
///
/// let mut tree = BPlusTree::with_orders(3, 2).unwrap();
/// for key in [5, 10, 20] {
///     tree.insert(key, key * 100).unwrap();
/// }
///
/// assert_eq!(tree.height(), 2);
/// assert_eq!(tree.search(10).unwrap(), Some(&1000));
/// assert_eq!(tree.search(999).unwrap(), None);
///
/// let deleted = tree.delete(5).unwrap().unwrap();
/// assert_eq!(deleted.locator, 500);
/// assert_eq!(tree.height(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<L> {
    pub(super) arena: NodeArena<L>,
    pub(super) root: NodeId,
    pub(super) config: IndexConfig,
    len: usize,
    steps: Vec<Step>,
}

impl<L> BPlusTree<L> {
    /// Create an empty tree with the default orders (internal 3, leaf 2).
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Create an empty tree with the given orders.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if the orders are out of range.
    pub fn with_orders(internal_order: usize, leaf_order: usize) -> Result<Self> {
        IndexConfig::new(internal_order, leaf_order).map(Self::from_valid_config)
    }

    /// Create an empty tree from a full config.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if the orders are out of range.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        let validated = IndexConfig::new(config.internal_order, config.leaf_order)?;
        Ok(Self::from_valid_config(
            validated.with_step_recording(config.record_steps),
        ))
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::Leaf(LeafNode::new()));
        Self {
            arena,
            root,
            config,
            len: 0,
            steps: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Id of the current root node.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Whether the root is a leaf (height 1).
    pub fn root_is_leaf(&self) -> bool {
        self.arena.get(self.root).is_leaf()
    }

    /// Number of levels, counting the leaf level. An empty tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let Node::Internal(internal) = self.arena.get(id) {
            height += 1;
            id = internal.children[0];
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Drain the steps recorded since the last call.
    ///
    /// Always empty unless step recording is enabled in the config.
    pub fn take_steps(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.steps)
    }

    /// Remove every key, returning to the canonical empty state.
    pub fn clear(&mut self) {
        *self = Self::from_valid_config(self.config);
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Look up the locator stored under `key`.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if `key` is not a finite number.
    pub fn search<K: AsKey>(&self, key: K) -> Result<Option<&L>> {
        let key = key.as_key()?;
        let mut id = self.root;
        loop {
            match self.arena.get(id) {
                Node::Leaf(leaf) => return Ok(leaf.search(&key)),
                Node::Internal(internal) => id = internal.children[internal.child_index(&key)],
            }
        }
    }

    /// Whether `key` is present.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if `key` is not a finite number.
    pub fn contains_key<K: AsKey>(&self, key: K) -> Result<bool> {
        Ok(self.search(key)?.is_some())
    }

    /// Iterate all entries in key order by following the leaf chain.
    pub fn iter(&self) -> Iter<'_, L> {
        Iter::new(&self.arena, self.leftmost_leaf(), self.len)
    }

    pub(super) fn leftmost_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Node::Internal(internal) = self.arena.get(id) {
            id = internal.children[0];
        }
        id
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert `key` with `locator`, replacing the locator if the key exists.
    ///
    /// If the root splits, a new internal root is created over the old root
    /// and its new sibling. This is the only way the tree grows taller.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if `key` is not a finite number. The tree
    /// is left untouched in that case.
    pub fn insert<K: AsKey>(&mut self, key: K, locator: L) -> Result<()> {
        let key = key.as_key()?;

        if let Some(split) = self.insert_into(self.root, key, locator)? {
            let old_root = self.root;
            self.root = self.arena.alloc(Node::Internal(InternalNode::with_children(
                old_root,
                split.promoted,
                split.right,
            )));
            let height = self.height();
            debug!(
                "root split: {} over {} and {} (separator {}), height {}",
                self.root, old_root, split.right, split.promoted, height
            );
            self.record(Step::NewRoot {
                root: self.root,
                height,
            });
        }
        Ok(())
    }

    fn insert_into(&mut self, id: NodeId, key: Key, locator: L) -> Result<Option<Split>> {
        let route = match self.arena.get(id) {
            Node::Leaf(_) => None,
            Node::Internal(internal) => {
                let index = internal.child_index(&key);
                Some((index, internal.children[index]))
            }
        };

        match route {
            None => self.insert_into_leaf(id, key, locator),
            Some((index, child)) => match self.insert_into(child, key, locator)? {
                Some(split) => self.install_split(id, index, split),
                None => Ok(None),
            },
        }
    }

    fn insert_into_leaf(&mut self, id: NodeId, key: Key, locator: L) -> Result<Option<Split>> {
        let order = self.config.leaf_order;
        let leaf = self.leaf_node_mut(id)?;
        let outcome = leaf.insert(key, locator);
        let overflow = (leaf.len() > order).then(|| leaf.split());

        match outcome {
            LeafInsert::Replaced(_) => {
                self.record(Step::UpdateLeaf { leaf: id, key });
                return Ok(None);
            }
            LeafInsert::Inserted(index) => {
                self.len += 1;
                self.record(Step::InsertLeaf {
                    leaf: id,
                    key,
                    index,
                });
            }
        }

        let Some((promoted, right)) = overflow else {
            return Ok(None);
        };
        let right_id = self.arena.alloc(Node::Leaf(right));
        self.leaf_node_mut(id)?.next = Some(right_id);
        debug!("leaf split: {} -> {} (promote {})", id, right_id, promoted);
        self.record(Step::SplitLeaf {
            left: id,
            right: right_id,
            promoted,
        });
        Ok(Some(Split {
            promoted,
            right: right_id,
        }))
    }

    /// Absorb a child's split into internal node `id`, splitting in turn if
    /// it now has more than `internal_order` children.
    fn install_split(&mut self, id: NodeId, index: usize, split: Split) -> Result<Option<Split>> {
        let order = self.config.internal_order;
        let internal = self.internal_node_mut(id)?;
        internal.insert_child(index, split.promoted, split.right);
        if internal.children.len() <= order {
            return Ok(None);
        }

        let (promoted, right) = internal.split();
        let right_id = self.arena.alloc(Node::Internal(right));
        debug!("internal split: {} -> {} (promote {})", id, right_id, promoted);
        self.record(Step::SplitInternal {
            left: id,
            right: right_id,
            promoted,
        });
        Ok(Some(Split {
            promoted,
            right: right_id,
        }))
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Remove `key`, returning it with its locator, or `None` if absent.
    ///
    /// Underflowing nodes are repaired on the way back up (borrow from a
    /// sibling, otherwise merge). Afterwards the root is normalized: a root
    /// with a single child is replaced by that child, and an empty leaf root
    /// is replaced by a fresh empty leaf.
    ///
    /// # Errors
    /// - `Error::InvalidKey` if `key` is not a finite number (no mutation).
    /// - `Error::InvariantViolation` if the structure is found inconsistent.
    ///   This is a bug, not a recoverable condition.
    pub fn delete<K: AsKey>(&mut self, key: K) -> Result<Option<Deleted<L>>> {
        let key = key.as_key()?;

        let Some(removal) = self.delete_from(self.root, key)? else {
            self.record(Step::NotFound { key });
            return Ok(None);
        };
        self.len -= 1;

        // Root underflow is never propagated: the root has no siblings.
        self.normalize_root(&removal.deleted.key)?;
        Ok(Some(removal.deleted))
    }

    fn delete_from(&mut self, id: NodeId, key: Key) -> Result<Option<Removal<L>>> {
        let min_leaf_keys = self.config.min_leaf_keys();
        let (index, child) = match self.arena.get_mut(id) {
            Node::Leaf(leaf) => {
                let Some(locator) = leaf.remove(&key) else {
                    return Ok(None);
                };
                let underflow = leaf.len() < min_leaf_keys;
                self.record(Step::DeleteLeaf { leaf: id, key });
                return Ok(Some(Removal {
                    deleted: Deleted { key, locator },
                    underflow,
                }));
            }
            Node::Internal(internal) => {
                let index = internal.child_index(&key);
                (index, internal.children[index])
            }
        };

        let Some(removal) = self.delete_from(child, key)? else {
            return Ok(None);
        };

        if removal.underflow {
            self.rebalance_child(id, index)?;
        }
        // Must follow rebalancing: a borrow or merge can change which subtree
        // sits right of the stale separator.
        self.replace_separator(id, &removal.deleted.key)?;

        let underflow = self.arena.get(id).occupancy() < self.config.min_internal_children();
        Ok(Some(Removal {
            deleted: removal.deleted,
            underflow,
        }))
    }

    fn normalize_root(&mut self, deleted: &Key) -> Result<()> {
        let collapse_to = match self.arena.get(self.root) {
            Node::Internal(root) if root.children.len() == 1 => Some(root.children[0]),
            Node::Internal(root) if root.keys.is_empty() => {
                return Err(Error::InvariantViolation(format!(
                    "root {} has no separators but {} children",
                    self.root,
                    root.children.len()
                )));
            }
            Node::Internal(_) | Node::Leaf(_) => None,
        };

        if let Some(child) = collapse_to {
            let old_root = self.root;
            self.arena.release(old_root);
            self.root = child;
            let height = self.height();
            debug!("root collapse: {} replaced by {}, height {}", old_root, child, height);
            self.record(Step::CollapseRoot {
                root: child,
                height,
            });
            // A merge just below the old root can pull the deleted key down
            // as a separator of the new root.
            if !self.root_is_leaf() {
                self.replace_separator(self.root, deleted)?;
            }
        }

        if matches!(self.arena.get(self.root), Node::Leaf(leaf) if leaf.is_empty()) {
            let old_root = self.root;
            self.arena.release(old_root);
            self.root = self.arena.alloc(Node::Leaf(LeafNode::new()));
            debug!("tree emptied: fresh root leaf {}", self.root);
        }
        Ok(())
    }

    pub(super) fn record(&mut self, step: Step) {
        log::trace!("{:?}", step);
        if self.config.record_steps {
            self.steps.push(step);
        }
    }
}

impl<L> Default for BPlusTree<L> {
    fn default() -> Self {
        Self::new()
    }
}
