//! Error types for bplusdb.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in bplusdb.
///
/// A key that is simply absent from the index is *not* an error: lookups and
/// deletes report it as `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading input (e.g. a CSV file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key could not be coerced to an ordered numeric scalar.
    #[error("Invalid key {0:?}: must be a finite number")]
    InvalidKey(String),

    /// Node capacities outside the supported range.
    #[error("Invalid order: internal={internal}, leaf={leaf}")]
    InvalidOrder { internal: usize, leaf: usize },

    /// The tree reached a state that rebalancing should have made impossible.
    ///
    /// This indicates a bug, never a recoverable condition.
    #[error("B+ tree invariant violated: {0}")]
    InvariantViolation(String),

    /// A fixed-width record image had the wrong length.
    #[error("Record size mismatch: expected {expected}, got {actual}")]
    RecordSize { expected: usize, actual: usize },

    /// No loaded record exists at the given index.
    #[error("Record #{0} not found")]
    RecordNotFound(usize),

    /// A snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV input had no header or no data rows.
    #[error("CSV input is empty or has no data rows")]
    EmptyCsv,
}
