//! Installation configuration: schema, loading and validation.
//!
//! An installation file describes the static station/valve topology and the
//! server's runtime settings. Topology is fixed at startup; nothing here
//! changes while the process runs.

pub mod schema;
pub mod validate;

use std::path::Path;

use thiserror::Error;

pub use schema::{Installation, ServerDef, StationDef, LATEST_VERSION};
pub use validate::{validate_installation, ValidationError};

/// Errors from loading or saving an installation file.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read installation file: {path}")]
    FileRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse installation YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Load and validate an installation from a YAML file.
pub fn load_installation(path: &Path) -> Result<Installation, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|e| ProjectError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let installation: Installation = serde_yaml::from_str(&content)?;
    validate_installation(&installation)?;
    Ok(installation)
}
