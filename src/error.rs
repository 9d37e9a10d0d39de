//! Error types for book reconstruction.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.
//!
//! The core engine never aborts a replay on a single bad event: recoverable
//! faults (`DuplicateOrder`, `OrderNotFound`) are surfaced per-event, logged,
//! and the stream continues. Fatal I/O faults only exist in the adapters.

use thiserror::Error;

/// Result type alias for book operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Main error type for book reconstruction.
#[derive(Error, Debug, Clone)]
pub enum BookError {
    /// Add event for an order identifier that already exists.
    /// A data-integrity fault: the event is skipped, the stream continues.
    #[error("Duplicate order ID: {0}")]
    DuplicateOrder(u64),

    /// Cancel/reduce referencing an order the index does not know.
    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    /// Invalid price (negative).
    #[error("Invalid price: {0}")]
    InvalidPrice(i64),

    /// Invalid size (zero).
    #[error("Invalid size: {0}")]
    InvalidSize(u32),

    /// Unrecognized action byte in the input.
    #[error("Invalid action: {0:?}")]
    InvalidAction(char),

    /// Unrecognized side byte in the input.
    #[error("Invalid side: {0:?}")]
    InvalidSide(char),

    /// A delimited input record that could not be decoded into an event.
    /// Adapter-level: whether this aborts the run is the loader's policy.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Book state inconsistency detected (index and ladder disagree).
    #[error("Book inconsistency: {0}")]
    InconsistentState(String),

    /// I/O failure in an adapter (unreadable source, unwritable destination).
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BookError {
    fn from(err: std::io::Error) -> Self {
        BookError::Io(err.to_string())
    }
}

impl From<csv::Error> for BookError {
    fn from(err: csv::Error) -> Self {
        BookError::Io(err.to_string())
    }
}
