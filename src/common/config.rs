//! Configuration constants for bplusdb.

use super::error::{Error, Result};

/// Size of a storage block in bytes.
pub const BLOCK_SIZE: usize = 512;

/// Width in bytes of each fixed-length record field, in on-disk order.
///
/// ```text
/// Field            Width
/// ---------------  -----
/// name             30
/// ssn              9
/// department code  9
/// address          40
/// phone            9
/// birthdate        8
/// sex              1
/// job code         4
/// salary           4
/// deleted flag     1
/// ```
pub const FIELD_WIDTHS: [usize; 10] = [30, 9, 9, 40, 9, 8, 1, 4, 4, 1];

/// Size of one encoded record (sum of [`FIELD_WIDTHS`]).
pub const RECORD_SIZE: usize = sum_widths(&FIELD_WIDTHS);

/// Records that fit in one block.
pub const BLOCKING_FACTOR: usize = BLOCK_SIZE / RECORD_SIZE;

/// Default maximum child count of an internal node.
pub const DEFAULT_INTERNAL_ORDER: usize = 3;

/// Default maximum key count of a leaf node.
pub const DEFAULT_LEAF_ORDER: usize = 2;

/// Smallest internal order that still lets a split produce two valid halves.
pub const MIN_INTERNAL_ORDER: usize = 3;

/// Smallest leaf order.
pub const MIN_LEAF_ORDER: usize = 1;

const fn sum_widths(widths: &[usize]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < widths.len() {
        total += widths[i];
        i += 1;
    }
    total
}

/// Tuning knobs for a [`BPlusTree`](crate::index::BPlusTree).
///
/// # Example
/// ```
/// use bplusdb::common::IndexConfig;
///
/// let config = IndexConfig::new(4, 3).unwrap().with_step_recording(true);
/// assert_eq!(config.internal_order, 4);
/// assert!(config.record_steps);
///
/// assert!(IndexConfig::new(2, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Maximum number of children of an internal node.
    pub internal_order: usize,
    /// Maximum number of keys held by a leaf.
    pub leaf_order: usize,
    /// Record a [`Step`](crate::index::Step) for every structural change.
    pub record_steps: bool,
}

impl IndexConfig {
    /// Create a config with validated orders.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if `internal_order < 3` or `leaf_order < 1`.
    pub fn new(internal_order: usize, leaf_order: usize) -> Result<Self> {
        if internal_order < MIN_INTERNAL_ORDER || leaf_order < MIN_LEAF_ORDER {
            return Err(Error::InvalidOrder {
                internal: internal_order,
                leaf: leaf_order,
            });
        }
        Ok(Self {
            internal_order,
            leaf_order,
            record_steps: false,
        })
    }

    /// Enable or disable step recording.
    pub fn with_step_recording(mut self, enabled: bool) -> Self {
        self.record_steps = enabled;
        self
    }

    /// Minimum child count of a non-root internal node.
    #[inline]
    pub fn min_internal_children(&self) -> usize {
        self.internal_order.div_ceil(2)
    }

    /// Minimum key count of a non-root leaf.
    #[inline]
    pub fn min_leaf_keys(&self) -> usize {
        self.leaf_order.div_ceil(2)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            internal_order: DEFAULT_INTERNAL_ORDER,
            leaf_order: DEFAULT_LEAF_ORDER,
            record_steps: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layout() {
        assert_eq!(RECORD_SIZE, 115);
        assert_eq!(BLOCKING_FACTOR, 4);
    }

    #[test]
    fn test_default_orders() {
        let config = IndexConfig::default();
        assert_eq!(config.internal_order, 3);
        assert_eq!(config.leaf_order, 2);
        assert_eq!(config.min_internal_children(), 2);
        assert_eq!(config.min_leaf_keys(), 1);
        assert!(!config.record_steps);
    }

    #[test]
    fn test_invalid_orders_rejected() {
        assert!(matches!(
            IndexConfig::new(2, 2),
            Err(Error::InvalidOrder {
                internal: 2,
                leaf: 2
            })
        ));
        assert!(IndexConfig::new(3, 0).is_err());
        assert!(IndexConfig::new(3, 1).is_ok());
    }

    #[test]
    fn test_min_occupancy_rounds_up() {
        let config = IndexConfig::new(5, 3).unwrap();
        assert_eq!(config.min_internal_children(), 3);
        assert_eq!(config.min_leaf_keys(), 2);
    }
}
