//! Top-level error type for migration runs.

use settings_formatter::FormatError;
use std::io;
use std::path::PathBuf;

use crate::config::PlanError;
use crate::extract::ExtractError;

/// Fatal errors. Unrepresentable values are not errors; they end up in the
/// diagnostics artifact instead.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Document not found: {}", .0.display())]
    MissingDocument(PathBuf),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Invalid file name pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("Failed to list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Unknown project '{0}'")]
    UnknownProject(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MigrateError {
    /// Whether the error comes from a reserved-namespace type missing from
    /// the type table.
    pub fn is_unhandled_system_type(&self) -> bool {
        matches!(
            self,
            MigrateError::Format(FormatError::UnhandledSystemType { .. })
        )
    }
}
