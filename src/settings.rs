//! Extraction settings
//!
//! Limits applied while reading and parsing a score. Every field has a
//! default, so a JSON settings file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default cap on the size of a score file (or of the XML inside an `.mxl`)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// Default cap on the number of XML nodes in one document
pub const DEFAULT_MAX_XML_NODES: u32 = 4_000_000;

/// Configuration options for extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Largest input accepted, in bytes
    pub max_file_bytes: u64,

    /// Largest XML tree accepted, in nodes
    pub max_xml_nodes: u32,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        ExtractSettings {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_xml_nodes: DEFAULT_MAX_XML_NODES,
        }
    }
}

/// Errors loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractSettings {
    /// Load settings from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: ExtractSettings = serde_json::from_str(r#"{"max_file_bytes": 1024}"#).unwrap();
        assert_eq!(settings.max_file_bytes, 1024);
        assert_eq!(settings.max_xml_nodes, DEFAULT_MAX_XML_NODES);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_xml_nodes": 500}}"#).unwrap();

        let settings = ExtractSettings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.max_xml_nodes, 500);
        assert_eq!(settings.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ExtractSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Json { .. }));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = ExtractSettings::from_json_file(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
