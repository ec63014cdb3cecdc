//! Block header.
//!
//! Every encoded block starts with a [`BlockHeader`]:
//! - owning [`BlockId`]
//! - number of occupied slots
//! - CRC32 checksum for integrity

use crate::common::BlockId;

/// Metadata stored at the beginning of every block image.
///
/// # Layout (10 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     block_id (little-endian)
/// 4       2     record_count (little-endian)
/// 6       4     checksum (CRC32, little-endian)
/// ```
///
/// # Checksum
/// Computed over the whole block image with the checksum field zeroed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_id: BlockId,
    pub record_count: u16,
    pub checksum: u32,
}

impl BlockHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 10;

    pub const OFFSET_BLOCK_ID: usize = 0;
    pub const OFFSET_RECORD_COUNT: usize = 4;
    pub const OFFSET_CHECKSUM: usize = 6;

    pub fn new(block_id: BlockId, record_count: u16) -> Self {
        Self {
            block_id,
            record_count,
            checksum: 0,
        }
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < BlockHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for BlockHeader");

        let block_id = u32::from_le_bytes([
            data[Self::OFFSET_BLOCK_ID],
            data[Self::OFFSET_BLOCK_ID + 1],
            data[Self::OFFSET_BLOCK_ID + 2],
            data[Self::OFFSET_BLOCK_ID + 3],
        ]);
        let record_count = u16::from_le_bytes([
            data[Self::OFFSET_RECORD_COUNT],
            data[Self::OFFSET_RECORD_COUNT + 1],
        ]);
        let checksum = u32::from_le_bytes([
            data[Self::OFFSET_CHECKSUM],
            data[Self::OFFSET_CHECKSUM + 1],
            data[Self::OFFSET_CHECKSUM + 2],
            data[Self::OFFSET_CHECKSUM + 3],
        ]);

        Self {
            block_id: BlockId::new(block_id),
            record_count,
            checksum,
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < BlockHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for BlockHeader");

        data[Self::OFFSET_BLOCK_ID..Self::OFFSET_BLOCK_ID + 4]
            .copy_from_slice(&self.block_id.0.to_le_bytes());
        data[Self::OFFSET_RECORD_COUNT..Self::OFFSET_RECORD_COUNT + 2]
            .copy_from_slice(&self.record_count.to_le_bytes());
        data[Self::OFFSET_CHECKSUM..Self::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&self.checksum.to_le_bytes());
    }

    /// CRC32 of a block image, skipping the checksum field itself.
    pub fn compute_checksum(block_data: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&block_data[..Self::OFFSET_CHECKSUM]);
        hasher.update(&[0u8; 4]);
        hasher.update(&block_data[Self::OFFSET_CHECKSUM + 4..]);
        hasher.finalize()
    }

    pub fn verify_checksum(&self, block_data: &[u8]) -> bool {
        self.checksum == Self::compute_checksum(block_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::BLOCK_SIZE;

    #[test]
    fn test_header_roundtrip() {
        let original = BlockHeader {
            block_id: BlockId::new(7),
            record_count: 3,
            checksum: 0xDEADBEEF,
        };
        let mut buffer = [0u8; BlockHeader::SIZE];
        original.write_to(&mut buffer);
        assert_eq!(BlockHeader::from_bytes(&buffer), original);
    }

    #[test]
    fn test_header_byte_layout() {
        let header = BlockHeader {
            block_id: BlockId::new(0x04030201),
            record_count: 0x0201,
            checksum: 0x04030201,
        };
        let mut buffer = [0u8; BlockHeader::SIZE];
        header.write_to(&mut buffer);

        assert_eq!(buffer[0], 0x01);
        assert_eq!(buffer[3], 0x04);
        assert_eq!(buffer[4], 0x01);
        assert_eq!(buffer[5], 0x02);
        assert_eq!(buffer[6], 0x01);
        assert_eq!(buffer[9], 0x04);
    }

    #[test]
    fn test_checksum_ignores_checksum_field() {
        let mut block = [0u8; BLOCK_SIZE];
        block[100] = 0xAB;
        let before = BlockHeader::compute_checksum(&block);

        block[6..10].copy_from_slice(&[0xFF; 4]);
        assert_eq!(BlockHeader::compute_checksum(&block), before);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut block = [0u8; BLOCK_SIZE];
        block[200] = 0x11;
        let header = BlockHeader {
            checksum: BlockHeader::compute_checksum(&block),
            ..BlockHeader::default()
        };
        assert!(header.verify_checksum(&block));

        block[200] = 0x12;
        assert!(!header.verify_checksum(&block));
    }
}
