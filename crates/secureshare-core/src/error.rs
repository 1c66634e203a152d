//! Error types module
//!
//! Core errors cover session persistence only; network and HTTP status
//! errors live in the api-client crate where the responses are produced.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid session data: {0}")]
    InvalidSession(String),
}
