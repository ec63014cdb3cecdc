//! Slot identifier type.

use std::fmt;

use serde::Serialize;

/// Identifies a record slot within a block.
///
/// Using `usize` because slots index straight into a block's record vector:
/// `records[slot.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Create a new SlotId.
    #[inline]
    pub fn new(id: usize) -> Self {
        SlotId(id)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_id_display() {
        assert_eq!(format!("{}", SlotId::new(2)), "Slot(2)");
    }
}
