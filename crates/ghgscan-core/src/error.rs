//! Error types for ghgscan.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Text acquisition produced nothing usable. The only fatal pipeline error.
    #[error("No text could be extracted from the document")]
    NoTextExtracted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Acquisition error: {0}")]
    Acquisition(String),

    #[error("Summary error: {0}")]
    Summary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
