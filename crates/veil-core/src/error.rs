use thiserror::Error;

/// Core error type shared across veil crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The table schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A record was addressed by a column the table does not have.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    /// A record does not have the arity its table declares.
    #[error("record has {actual} values but table declares {expected} columns")]
    Arity { expected: usize, actual: usize },
}

/// Convenience alias for results returned by veil crates.
pub type Result<T> = std::result::Result<T, Error>;
