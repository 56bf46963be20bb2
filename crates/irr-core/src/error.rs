//! Error types for the control core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while constructing the control model.
///
/// Runtime command outcomes are not errors: rejected commands are reported
/// through boolean returns, never through this enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid argument provided to a constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Two stations were configured with the same identifier.
    #[error("Duplicate station id: {id}")]
    DuplicateStation { id: String },
}
