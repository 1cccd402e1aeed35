//! Error types for dynamic bit vector operations.

use thiserror::Error;

/// Error variants for dynamic bit vector operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An index was provided that is out of the vector's bounds.
    #[error("index {0} out of bounds for length {1}")]
    IndexOutOfBounds(usize, usize),

    /// A selection query was performed for an occurrence that does not exist.
    #[error("invalid selection: occurrence {0} not found")]
    InvalidSelection(usize),
}

/// A specialized Result type for bit vector operations.
pub type Result<T> = std::result::Result<T, Error>;
