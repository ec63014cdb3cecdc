//! Node identifier type.

use std::fmt;

use serde::Serialize;

/// Identifies a node slot inside a tree's node arena.
///
/// Parents refer to their children by `NodeId`, and each leaf refers to the
/// next leaf in key order the same way. An id is only meaningful for the tree
/// that issued it, and stops being meaningful once a merge absorbs the node.
///
/// # Example
/// ```
/// use bplusdb::NodeId;
///
/// let node_id = NodeId::new(42);
/// assert_eq!(node_id.0, 42);
/// assert_eq!(node_id.index(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Position of the node in the arena's slot vector.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
