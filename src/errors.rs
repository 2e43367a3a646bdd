use std::io;

use thiserror::Error;

/// Error type that captures scheduler, storage, and protocol failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The backing store could not be reached at startup. Fatal: the
    /// service must not begin accepting requests.
    #[error("Store unreachable: {0}")]
    Connectivity(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
}
