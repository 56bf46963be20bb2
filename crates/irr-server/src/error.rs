//! Error types for the server layer.

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error wrapping the lower-level crates.
///
/// Only initialization-time failures surface here; per-tick per-valve
/// boundary problems are logged and isolated inside the reconciliation loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Project(#[from] irr_project::ProjectError),

    #[error("Model error: {0}")]
    Core(#[from] irr_core::CoreError),

    #[error("Invalid listen address '{addr}': {source}")]
    ListenAddr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
