use std::path::PathBuf;

use dashgrid_layout::{GridRejection, SnapshotMigrationError, SnapshotValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state file not found: {path} (run `dashgrid init` first)")]
    StateMissing { path: PathBuf },

    #[error("state file already exists: {path} (pass --force to overwrite)")]
    StateExists { path: PathBuf },

    #[error("invalid state file: {0}")]
    Snapshot(#[from] SnapshotValidationError),

    #[error("cannot migrate state file: {0}")]
    Migration(#[from] SnapshotMigrationError),

    #[error("rejected: {0}")]
    Rejection(#[from] GridRejection),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Rejection(GridRejection::CapacityExceeded { .. }) => 4,
            Self::Rejection(_) => 3,
            Self::StateMissing { .. }
            | Self::StateExists { .. }
            | Self::Snapshot(_)
            | Self::Migration(_) => 5,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
