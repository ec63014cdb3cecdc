//! In-memory B+ tree.
//!
//! Maps numeric [`Key`]s to caller-supplied locators. All entries live in
//! leaves; internal nodes only hold separators. Leaves are chained left to
//! right through `next` links for ordered scans.
//!
//! # Components
//! - [`BPlusTree`] - The tree itself: search, insert, delete
//! - [`Key`] / [`AsKey`] - Ordered key type and conversions into it
//! - [`Iter`] - Ordered scan along the leaf chain
//! - [`Step`] - Structural change events for visualization
//! - [`TreeSnapshot`] / [`NodeView`] - Read-only level-by-level views
//!
//! # Node Ownership
//! Nodes are stored in an arena and addressed by [`NodeId`](crate::NodeId).
//! Parents hold child ids; there are no parent back-pointers. Rebalancing is
//! driven from the parent while the delete path unwinds.

mod arena;
mod internal;
mod iter;
mod key;
mod leaf;
mod node;
mod rebalance;
mod snapshot;
mod step;
mod tree;
mod validate;

pub use iter::Iter;
pub use key::{AsKey, Key};
pub use node::Deleted;
pub use snapshot::{NodeView, TreeSnapshot};
pub use step::Step;
pub use tree::BPlusTree;
