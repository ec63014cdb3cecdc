//! Fixed-capacity blocks of records.

use std::fmt::Write as _;

use crate::common::config::{BLOCKING_FACTOR, BLOCK_SIZE, RECORD_SIZE};
use crate::common::{BlockId, SlotId};

use super::block_header::BlockHeader;
use super::record::Record;

/// A block holding up to [`BLOCKING_FACTOR`] records.
///
/// Records are appended to the next free slot and never move. Deleting a
/// record only sets its deleted flag; the slot stays occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    records: Vec<Record>,
}

impl Block {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            records: Vec::with_capacity(BLOCKING_FACTOR),
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.records.len() >= BLOCKING_FACTOR
    }

    pub fn get(&self, slot: SlotId) -> Option<&Record> {
        self.records.get(slot.0)
    }

    /// Append a record. Returns the slot it landed in, or `None` if full.
    pub fn add_record(&mut self, record: Record) -> Option<SlotId> {
        if self.is_full() {
            return None;
        }
        self.records.push(record);
        Some(SlotId::new(self.records.len() - 1))
    }

    /// Flag the live record loaded from `line_number` as deleted.
    ///
    /// Returns the slot that was flagged, if any.
    pub fn mark_deleted(&mut self, line_number: u32) -> Option<SlotId> {
        let slot = self
            .records
            .iter()
            .position(|r| !r.deleted && r.line_number == Some(line_number))?;
        self.records[slot].deleted = true;
        Some(SlotId::new(slot))
    }

    /// Encode to a [`BLOCK_SIZE`] image: header, then records in slot order,
    /// then zero padding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; BLOCK_SIZE];
        for (i, record) in self.records.iter().enumerate() {
            let start = BlockHeader::SIZE + i * RECORD_SIZE;
            data[start..start + RECORD_SIZE].copy_from_slice(&record.to_bytes());
        }

        let mut header = BlockHeader::new(self.id, self.records.len() as u16);
        header.write_to(&mut data);
        header.checksum = BlockHeader::compute_checksum(&data);
        header.write_to(&mut data);
        data
    }

    /// Check an encoded image against the checksum in its header.
    pub fn verify_checksum(data: &[u8]) -> bool {
        data.len() == BLOCK_SIZE && BlockHeader::from_bytes(data).verify_checksum(data)
    }

    /// Human-readable dump of every slot.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "--- Block {} ---", self.id.0);
        if self.records.is_empty() {
            out.push_str("  [Empty]\n");
            return out;
        }
        for (i, record) in self.records.iter().enumerate() {
            let status = if record.deleted { "[DELETED]" } else { "[Active]" };
            let _ = writeln!(out, "  Slot {}:", i);
            let _ = writeln!(out, "    {}", status);
            let _ = writeln!(out, "    SSN: {}", record.ssn);
            let _ = writeln!(out, "    Name: {}", record.name);
            let _ = writeln!(out, "    Department: {}", record.department);
            let _ = writeln!(out, "    Salary: {}", record.salary);
            if let Some(line) = record.line_number {
                let _ = writeln!(out, "    Original Line Number: {}", line);
            }
        }
        out
    }
}
