//! Index structures.
//!
//! # Components
//! - [`btree`] - In-memory B+ tree mapping numeric keys to record locators

pub mod btree;

pub use btree::{AsKey, BPlusTree, Deleted, Iter, Key, NodeView, Step, TreeSnapshot};
