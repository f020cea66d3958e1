use std::path::PathBuf;
use thiserror::Error;

use crate::manager::MARKER_FILES;

#[derive(Debug, Error)]
pub enum DevkitError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "no package manager detected in {}: expected one of {}",
        root.display(),
        MARKER_FILES.join(", ")
    )]
    ManagerNotDetected { root: PathBuf },

    #[error("no script runtime found: install bun, deno or node")]
    NoScriptRuntime,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DevkitError>;
