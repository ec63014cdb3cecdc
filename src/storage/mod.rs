//! Storage layer - records, blocks, and the indexed record store.
//!
//! This module simulates a block-oriented data file:
//! - [`Record`] - Fixed-width employee record
//! - [`Block`] / [`BlockHeader`] - Fixed-capacity block and its checksummed header
//! - [`RecordStore`] - Blocks plus a B+ tree index on SSN

mod block;
mod block_header;
mod csv;
mod record;
mod record_store;

pub use block::Block;
pub use block_header::BlockHeader;
pub use record::Record;
pub use record_store::{RecordLocator, RecordStore};
