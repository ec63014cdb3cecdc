//! Common types and utilities shared across bplusdb.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`IndexConfig`]
//! - Error types
//! - Identifiers (NodeId, BlockId, SlotId)

pub mod config;
pub mod error;
mod block_id;
mod node_id;
mod slot_id;

pub use block_id::BlockId;
pub use config::IndexConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;
pub use slot_id::SlotId;
