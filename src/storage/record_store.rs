//! Simulated block file indexed by SSN.
//!
//! The [`RecordStore`] owns three things:
//! - the records loaded from CSV, in file order
//! - a list of fixed-capacity [`Block`]s that inserted records are appended to
//! - a [`BPlusTree`] from SSN to the record's [`RecordLocator`]
//!
//! # Example
//! ```
//! use bplusdb::common::IndexConfig;
//! use bplusdb::storage::RecordStore;
//!
//! let mut store = RecordStore::new(IndexConfig::default()).unwrap();
//! store.load_csv("NAME,SSN\nAlice,111\nBob,222\n").unwrap();
//!
//! let locator = store.insert_record(1).unwrap();
//! assert_eq!(locator.line_number, Some(2));
//! assert_eq!(store.find_by_ssn("222").unwrap().unwrap().name, "Bob");
//! ```

use std::fmt::Write as _;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::common::{BlockId, Error, IndexConfig, Result, SlotId};
use crate::index::{AsKey, BPlusTree, Deleted, Key};

use super::block::Block;
use super::csv;
use super::record::Record;

/// Where a record lives: the value stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordLocator {
    pub block_id: BlockId,
    pub slot: SlotId,
    pub line_number: Option<u32>,
}

/// Block storage plus its SSN index.
#[derive(Debug)]
pub struct RecordStore {
    blocks: Vec<Block>,
    records: Vec<Record>,
    tree: BPlusTree<RecordLocator>,
}

impl RecordStore {
    /// Create an empty store with one empty block.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if the config's orders are out of range.
    pub fn new(config: IndexConfig) -> Result<Self> {
        Ok(Self {
            blocks: vec![Block::new(BlockId::new(0))],
            records: Vec::new(),
            tree: BPlusTree::with_config(config)?,
        })
    }

    /// Replace the loaded record list with the contents of a CSV document.
    ///
    /// Blocks and the index are left untouched. Returns the number of records
    /// loaded.
    ///
    /// # Errors
    /// Returns `Error::EmptyCsv` if the text has no header or no data line.
    pub fn load_csv(&mut self, text: &str) -> Result<usize> {
        self.records = csv::parse_records(text)?;
        debug!("Loaded {} records from CSV", self.records.len());
        Ok(self.records.len())
    }

    /// Read a CSV file and load it as [`load_csv`](Self::load_csv) does.
    pub fn load_csv_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let text = std::fs::read_to_string(path)?;
        self.load_csv(&text)
    }

    /// Store the loaded record at `index` and index it by SSN.
    ///
    /// # Errors
    /// - `Error::RecordNotFound` if no loaded record has that index.
    /// - `Error::InvalidKey` if its SSN is not numeric.
    pub fn insert_record(&mut self, index: usize) -> Result<RecordLocator> {
        let record = self
            .records
            .get(index)
            .cloned()
            .ok_or(Error::RecordNotFound(index))?;
        self.insert(record)
    }

    /// Store an arbitrary record and index it by SSN.
    ///
    /// The record goes into the first block with a free slot; a new block is
    /// allocated when every block is full. Re-inserting an SSN repoints the
    /// index at the newest copy.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if the SSN is not numeric. Nothing is
    /// stored in that case.
    pub fn insert(&mut self, record: Record) -> Result<RecordLocator> {
        let key = record.ssn_key()?;
        let line_number = record.line_number;

        let block = match self.blocks.iter().position(|b| !b.is_full()) {
            Some(i) => &mut self.blocks[i],
            None => {
                let id = BlockId::new(self.blocks.len() as u32);
                debug!("Allocated {}", id);
                self.blocks.push(Block::new(id));
                let last = self.blocks.len() - 1;
                &mut self.blocks[last]
            }
        };
        let block_id = block.id();
        let slot = block.add_record(record).ok_or_else(|| {
            Error::InvariantViolation(format!("{} has no free slot", block_id))
        })?;

        let locator = RecordLocator {
            block_id,
            slot,
            line_number,
        };
        self.tree.insert(key, locator)?;
        debug!("Inserted SSN {} into index -> {}, {}", key, block_id, slot);
        Ok(locator)
    }

    /// Delete the live record loaded from `line_number`.
    ///
    /// The record's deleted flag is set in its block. If the index entry for
    /// its SSN points at that slot, the entry is repointed at the newest live
    /// copy with the same SSN, or removed when none is left. An entry that
    /// points at another copy is left alone. Returns the flagged record's key
    /// and locator, or `Ok(None)` if no live record has that line.
    pub fn delete_record(&mut self, line_number: u32) -> Result<Option<Deleted<RecordLocator>>> {
        let mut flagged = None;
        for block in &mut self.blocks {
            if let Some(slot) = block.mark_deleted(line_number) {
                debug!("Marked {} {} deleted", block.id(), slot);
                flagged = block.get(slot).map(|r| (block.id(), slot, r.ssn_key()));
                break;
            }
        }

        let Some((block_id, slot, key)) = flagged else {
            debug!("Record #{} not found for deletion", line_number);
            return Ok(None);
        };
        let key = key?;
        let locator = RecordLocator {
            block_id,
            slot,
            line_number: Some(line_number),
        };

        let indexed = self.tree.search(key)?.copied();
        if indexed.is_some_and(|l| l.block_id == block_id && l.slot == slot) {
            match self.newest_live_copy(key) {
                Some(survivor) => {
                    self.tree.insert(key, survivor)?;
                    debug!("Repointed SSN {} -> {}, {}", key, survivor.block_id, survivor.slot);
                }
                None => {
                    self.tree.delete(key)?;
                    debug!("Deleted SSN {} from index", key);
                }
            }
        } else {
            debug!("SSN {} is indexed at another copy; index unchanged", key);
        }
        Ok(Some(Deleted { key, locator }))
    }

    /// The most recently stored live record whose SSN equals `key`.
    fn newest_live_copy(&self, key: Key) -> Option<RecordLocator> {
        self.blocks.iter().rev().find_map(|block| {
            block
                .records()
                .iter()
                .enumerate()
                .rev()
                .find(|(_, r)| !r.deleted && r.ssn_key().ok() == Some(key))
                .map(|(i, r)| RecordLocator {
                    block_id: block.id(),
                    slot: SlotId::new(i),
                    line_number: r.line_number,
                })
        })
    }

    /// Find a live record through the index.
    pub fn find_by_ssn<K: AsKey>(&self, ssn: K) -> Result<Option<&Record>> {
        let Some(locator) = self.tree.search(ssn)? else {
            return Ok(None);
        };
        Ok(self
            .blocks
            .get(locator.block_id.0 as usize)
            .and_then(|block| block.get(locator.slot))
            .filter(|record| !record.deleted))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn tree(&self) -> &BPlusTree<RecordLocator> {
        &self.tree
    }

    /// Drain the index's recorded steps.
    pub fn take_steps(&mut self) -> Vec<crate::index::Step> {
        self.tree.take_steps()
    }

    /// Text dump of every block.
    pub fn describe_blocks(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let _ = write!(out, "{}", block.describe());
        }
        out
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            blocks: vec![Block::new(BlockId::new(0))],
            records: Vec::new(),
            tree: BPlusTree::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::BLOCKING_FACTOR;

    const CSV: &str = "NAME,SSN,DEPARTMENTCODE,ADDRESS,PHONE,BIRTHDATE,SEX,JOBCODE,SALARY\n\
        Alice,500,ENG,\"1 Elm St, Springfield\",5550001,19800101,F,J1,100\n\
        Bob,300,OPS,2 Oak St,5550002,19810202,M,J2,200\n\
        Carol,900,ENG,3 Pine St,5550003,19820303,F,J1,300\n\
        Dave,100,HR,4 Ash St,5550004,19830404,M,J3,400\n\
        Erin,700,OPS,5 Fir St,5550005,19840505,F,J2,500\n";

    fn loaded() -> RecordStore {
        let mut store = RecordStore::new(IndexConfig::default()).unwrap();
        store.load_csv(CSV).unwrap();
        store
    }

    #[test]
    fn test_new_store() {
        let store = RecordStore::new(IndexConfig::default()).unwrap();
        assert_eq!(store.blocks().len(), 1);
        assert!(store.blocks()[0].is_empty());
        assert!(store.records().is_empty());
        assert!(store.tree().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let config = IndexConfig {
            internal_order: 2,
            leaf_order: 2,
            record_steps: false,
        };
        assert!(matches!(
            RecordStore::new(config),
            Err(Error::InvalidOrder { .. })
        ));
    }

    #[test]
    fn test_insert_fills_blocks_in_order() {
        let mut store = loaded();
        for i in 0..5 {
            store.insert_record(i).unwrap();
        }

        assert_eq!(store.blocks().len(), 2);
        assert_eq!(store.blocks()[0].len(), BLOCKING_FACTOR);
        assert_eq!(store.blocks()[1].len(), 1);

        let erin = store.tree().search(700).unwrap().unwrap();
        assert_eq!(erin.block_id, BlockId::new(1));
        assert_eq!(erin.slot, SlotId::new(0));
        assert_eq!(erin.line_number, Some(5));
        store.tree().check_invariants().unwrap();
    }

    #[test]
    fn test_insert_unknown_index() {
        let mut store = loaded();
        assert!(matches!(
            store.insert_record(42),
            Err(Error::RecordNotFound(42))
        ));
    }

    #[test]
    fn test_insert_rejects_bad_ssn_without_storing() {
        let mut store = loaded();
        let record = Record {
            ssn: "n/a".to_string(),
            ..Record::default()
        };
        assert!(matches!(store.insert(record), Err(Error::InvalidKey(_))));
        assert!(store.blocks()[0].is_empty());
    }

    #[test]
    fn test_find_by_ssn() {
        let mut store = loaded();
        store.insert_record(2).unwrap();

        let carol = store.find_by_ssn("900").unwrap().unwrap();
        assert_eq!(carol.name, "Carol");
        assert!(store.find_by_ssn(901).unwrap().is_none());
    }

    #[test]
    fn test_delete_record() {
        let mut store = loaded();
        for i in 0..5 {
            store.insert_record(i).unwrap();
        }

        // Bob is on line 2.
        let deleted = store.delete_record(2).unwrap().unwrap();
        assert_eq!(deleted.key.value(), 300.0);
        assert_eq!(deleted.locator.slot, SlotId::new(1));

        assert!(store.blocks()[0].records()[1].deleted);
        assert!(store.find_by_ssn(300).unwrap().is_none());
        assert_eq!(store.tree().len(), 4);
        store.tree().check_invariants().unwrap();

        // Second delete finds no live record.
        assert!(store.delete_record(2).unwrap().is_none());
        assert!(store.delete_record(99).unwrap().is_none());
    }

    #[test]
    fn test_describe_blocks() {
        let mut store = loaded();
        assert_eq!(store.describe_blocks(), "--- Block 0 ---\n  [Empty]\n");

        store.insert_record(0).unwrap();
        let text = store.describe_blocks();
        assert!(text.contains("  Slot 0:"));
        assert!(text.contains("SSN: 500"));
    }

    #[test]
    fn test_load_csv_file_missing() {
        let mut store = RecordStore::default();
        let result = store.load_csv_file("/definitely/not/here.csv");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
