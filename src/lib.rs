//! bplusdb - A block-oriented record store indexed by an in-memory B+ tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bplusdb                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          Record Store (storage/record_store)             │   │
//! │  │     CSV load → insert_record / delete_record / find      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                 ↓                            ↓                  │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐    │
//! │  │   Index (index/btree)    │  │   Blocks (storage/)      │    │
//! │  │  SSN → RecordLocator     │  │  Block + BlockHeader     │    │
//! │  │  split / borrow / merge  │  │  4 × 115-byte records    │    │
//! │  │  Step trace + snapshots  │  │  CRC32 checksum          │    │
//! │  └──────────────────────────┘  └──────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, BlockId, SlotId, Error, config)
//! - [`index`] - The B+ tree
//! - [`storage`] - Records, blocks, and the record store
//!
//! # Quick Start
//! ```
//! use bplusdb::BPlusTree;
//!
//! let mut tree = BPlusTree::with_orders(3, 2).unwrap();
//! tree.insert(5, "five").unwrap();
//! tree.insert(10, "ten").unwrap();
//! tree.insert(20, "twenty").unwrap();
//!
//! assert_eq!(tree.search(10).unwrap(), Some(&"ten"));
//! assert_eq!(tree.height(), 2);
//!
//! let removed = tree.delete(5).unwrap().unwrap();
//! assert_eq!(removed.locator, "five");
//! assert_eq!(tree.height(), 1);
//! ```

pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{BLOCK_SIZE, RECORD_SIZE};
pub use common::{BlockId, Error, IndexConfig, NodeId, Result, SlotId};

pub use index::{AsKey, BPlusTree, Deleted, Key, Step, TreeSnapshot};
pub use storage::{Record, RecordLocator, RecordStore};
