//! Error types for progress-bank.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing medium could not be written. Surfaced to the caller, never retried.
    #[error("failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode event: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored record could not be decoded. `list_all` logs and skips these.
    #[error("malformed record {}: {message}", path.display())]
    Deserialization { path: PathBuf, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
