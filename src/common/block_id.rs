//! Block identifier type.

use std::fmt;

use serde::Serialize;

/// Identifies a block in the record store.
///
/// Blocks are numbered in allocation order starting at 0, so the id doubles
/// as the block's position in the store.
///
/// # Example
/// ```
/// use bplusdb::BlockId;
///
/// let block_id = BlockId::new(3);
/// assert_eq!(format!("{}", block_id), "Block(3)");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u32) -> Self {
        BlockId(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_equality() {
        assert_eq!(BlockId::new(5), BlockId::new(5));
        assert_ne!(BlockId::new(5), BlockId::new(6));
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(format!("{}", BlockId::new(0)), "Block(0)");
    }
}
