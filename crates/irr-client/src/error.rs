//! Error types for the boundary client.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server rejected {path}: {status} {message}")]
    Rejected {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Valve not found: {0} (expected <StationId>_<ValveId>)")]
    ValveNotFound(String),

    #[error("Unexpected value type for {path}")]
    UnexpectedType { path: String },
}
