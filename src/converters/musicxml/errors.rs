//! Error types for score extraction
//!
//! Every failure aborts the whole extraction; callers never see a partially
//! filled score.

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Extraction failure
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML or unparsable element content
    #[error("parse error: {0}")]
    Parse(String),

    /// A compressed `.mxl` container that cannot be read
    #[error("invalid .mxl archive: {message}")]
    Archive {
        message: String,
        #[source]
        source: ZipError,
    },

    /// Well-formed XML that is not a part-wise MusicXML score
    #[error("unsupported score format: {0}")]
    Format(String),

    /// Input larger than the configured limits
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(message: impl Into<String>, source: ZipError) -> Self {
        ExtractError::Archive {
            message: message.into(),
            source,
        }
    }

    /// Content of `<element>` could not be interpreted
    pub(crate) fn invalid_value(element: &str, value: &str, reason: &str) -> Self {
        ExtractError::Parse(format!(
            "invalid value '{}' for <{}>: {}",
            value, element, reason
        ))
    }

    pub(crate) fn missing_element(element: &str, context: &str) -> Self {
        ExtractError::Parse(format!("missing <{}> in {}", element, context))
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
