//! Common error types for mallseg

use thiserror::Error;

/// Common result type for mallseg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the mallseg crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference dataset does not match the expected schema
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Clustering model could not be fitted
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
