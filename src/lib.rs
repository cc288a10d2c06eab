//! MusicXML Score Extractor
//!
//! Reads a part-wise MusicXML score (plain `.xml`/`.musicxml` or compressed
//! `.mxl`) and returns its metadata plus a flat list of note and chord events
//! with exact quarter-note timing.

pub mod converters;
pub mod grouping;
pub mod models;
pub mod settings;
pub mod sidecar;

// Re-export commonly used types
pub use converters::{extract_score_bytes, extract_score_file, extract_score_str, ExtractError, Result};
pub use grouping::{first_measures, group_by_measure};
pub use models::*;
pub use settings::{ExtractSettings, SettingsError};
pub use sidecar::find_sidecar_musicxml;
