//! Read-only views of the tree for visualization layers.
//!
//! A [`TreeSnapshot`] lists every node level by level, left to right, with
//! enough detail to redraw the tree: node kind, keys, children or locators,
//! and each leaf's `next` link. Taking a snapshot never mutates the tree.
//!
//! # Text Rendering
//! `Display` on a snapshot prints one line per level:
//! ```text
//! ROOT:
//! [Internal: 10]
//!
//! LEVEL 1:
//! [Leaf: 5]  →  [Leaf: 10, 20]
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::common::{NodeId, Result};

use super::key::Key;
use super::node::Node;
use super::tree::BPlusTree;

/// One node as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeView<L> {
    Leaf {
        id: NodeId,
        keys: Vec<Key>,
        locators: Vec<L>,
        next: Option<NodeId>,
    },
    Internal {
        id: NodeId,
        keys: Vec<Key>,
        children: Vec<NodeId>,
    },
}

impl<L> NodeView<L> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeView::Leaf { id, .. } | NodeView::Internal { id, .. } => *id,
        }
    }

    pub fn keys(&self) -> &[Key] {
        match self {
            NodeView::Leaf { keys, .. } | NodeView::Internal { keys, .. } => keys,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeView::Leaf { .. })
    }
}

impl<L> fmt::Display for NodeView<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_leaf() { "Leaf" } else { "Internal" };
        write!(f, "[{}: {}]", label, join_keys(self.keys()))
    }
}

/// The whole tree, level by level. `levels[0]` holds only the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot<L> {
    pub levels: Vec<Vec<NodeView<L>>>,
}

impl<L> TreeSnapshot<L> {
    /// Look up a node by id.
    pub fn find(&self, id: NodeId) -> Option<&NodeView<L>> {
        self.levels.iter().flatten().find(|view| view.id() == id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

impl<L: Serialize> TreeSnapshot<L> {
    /// Serialize to a JSON document.
    ///
    /// # Errors
    /// Returns `Error::Json` if a locator fails to serialize.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<L> fmt::Display for TreeSnapshot<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels.iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
                writeln!(f, "LEVEL {}:", depth)?;
            } else {
                writeln!(f, "ROOT:")?;
            }
            let line: Vec<String> = level.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", line.join("  →  "))?;
        }
        Ok(())
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<L: Clone> BPlusTree<L> {
    /// Capture every node, breadth first.
    pub fn snapshot(&self) -> TreeSnapshot<L> {
        let mut levels: Vec<Vec<NodeView<L>>> = Vec::new();
        let mut queue = VecDeque::from([(self.root, 0usize)]);

        while let Some((id, depth)) = queue.pop_front() {
            let view = match self.arena.get(id) {
                Node::Leaf(leaf) => NodeView::Leaf {
                    id,
                    keys: leaf.keys.clone(),
                    locators: leaf.locators.clone(),
                    next: leaf.next,
                },
                Node::Internal(internal) => {
                    queue.extend(internal.children.iter().map(|&child| (child, depth + 1)));
                    NodeView::Internal {
                        id,
                        keys: internal.keys.clone(),
                        children: internal.children.clone(),
                    }
                }
            };
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(view);
        }

        TreeSnapshot { levels }
    }
}

impl<L> BPlusTree<L> {
    /// Indented outline of the tree, one node per line.
    ///
    /// ```text
    /// Internal → [10]
    ///   Leaf → [5]
    ///   Leaf → [10, 20]
    /// ```
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.arena.get(id) {
                Node::Leaf(leaf) => {
                    out.push_str(&format!("{}Leaf → [{}]\n", indent, join_keys(&leaf.keys)));
                }
                Node::Internal(internal) => {
                    out.push_str(&format!(
                        "{}Internal → [{}]\n",
                        indent,
                        join_keys(&internal.keys)
                    ));
                    stack.extend(internal.children.iter().rev().map(|&child| (child, depth + 1)));
                }
            }
        }
        out
    }

    /// Keys in the order reached by following the leaf chain.
    pub fn leaf_keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len());
        let mut next = Some(self.leftmost_leaf());
        while let Some(id) = next {
            match self.arena.get(id) {
                Node::Leaf(leaf) => {
                    keys.extend_from_slice(&leaf.keys);
                    next = leaf.next;
                }
                Node::Internal(_) => break,
            }
        }
        keys
    }

    /// Keys in the order reached by descending through internal nodes.
    pub fn keys_in_order(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.arena.get(id) {
                Node::Leaf(leaf) => keys.extend_from_slice(&leaf.keys),
                Node::Internal(internal) => stack.extend(internal.children.iter().rev()),
            }
        }
        keys
    }
}
