//! @acp:module "Errors"
//! @acp:summary "Error taxonomy for parsing, generation and scanning"
//! @acp:domain cli
//! @acp:layer model

use std::path::PathBuf;

use thiserror::Error;

/// @acp:summary "Library error type"
#[derive(Debug, Error)]
pub enum AutodocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The compilation unit could not be opened or parsed at all
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Element metadata is inconsistent; isolated to a single member
    #[error("Inconsistent metadata for '{member}': {message}")]
    Metadata { member: String, message: String },

    /// Template rendering failed; callers log and fall back
    #[error("Template '{label}' failed: {message}")]
    Template { label: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl AutodocError {
    pub fn metadata(member: impl Into<String>, message: impl Into<String>) -> Self {
        AutodocError::Metadata {
            member: member.into(),
            message: message.into(),
        }
    }

    pub fn template(label: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AutodocError::Template {
            label: label.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutodocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_display() {
        let err = AutodocError::metadata("Pool.add", "duplicate parameter 'a'");
        assert_eq!(
            err.to_string(),
            "Inconsistent metadata for 'Pool.add': duplicate parameter 'a'"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AutodocError = io.into();
        assert!(matches!(err, AutodocError::Io(_)));
    }
}
