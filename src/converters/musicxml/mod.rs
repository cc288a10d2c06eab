//! MusicXML score extraction
//!
//! Turns a part-wise MusicXML document (plain or `.mxl`) into score metadata
//! and a flat list of note/chord events.
//!
//! # Pipeline
//!
//! ```text
//! path / bytes
//!   ↓ [container: size limit, unzip .mxl, decode]
//! XML text
//!   ↓ [parser: roxmltree, root must be score-partwise]
//! ScoreNode
//!   ↓ [metadata + musicxml_to_events]
//! ExtractedScore
//! ```
//!
//! Extraction is all-or-nothing: any error discards the whole result.
//!
//! # Basic Usage
//!
//! ```ignore
//! use score_extractor::{extract_score_file, ExtractSettings};
//!
//! let score = extract_score_file(Path::new("overture.musicxml"), &ExtractSettings::default())?;
//! println!("{} by {}", score.metadata.title, score.metadata.composer);
//! for event in &score.events {
//!     println!("{:?} {}", event.measure_number, event.pitch_label());
//! }
//! ```

pub mod container;
pub mod errors;
pub mod musicxml_to_events;
pub mod parser;

use std::path::Path;

use crate::models::{ExtractedScore, MusicEvent, ScoreMetadata};
use crate::settings::ExtractSettings;

// Re-export main API
pub use container::{read_score_source, ScoreSource};
pub use errors::{ExtractError, Result};
pub use musicxml_to_events::extract_events;
pub use parser::XmlDocument;

/// Extract metadata and events from a score file
///
/// # Errors
///
/// * `Io` - the file is missing or unreadable
/// * `ResourceLimit` - the file (or the score inside an `.mxl`) is too large
/// * `Parse` - malformed XML
/// * `Archive` - an `.mxl` container that cannot be opened or inflated
/// * `Format` - the root element is not `<score-partwise>`
pub fn extract_score_file(path: &Path, settings: &ExtractSettings) -> Result<ExtractedScore> {
    let source = read_score_source(path, settings)?;
    into_extracted(source.xml, settings)
}

/// Extract from raw file bytes (plain or compressed)
pub fn extract_score_bytes(bytes: Vec<u8>, settings: &ExtractSettings) -> Result<ExtractedScore> {
    let source = container::source_from_bytes(bytes, settings)?;
    into_extracted(source.xml, settings)
}

/// Extract from XML text already in memory
pub fn extract_score_str(xml: &str, settings: &ExtractSettings) -> Result<ExtractedScore> {
    if xml.len() as u64 > settings.max_file_bytes {
        return Err(ExtractError::ResourceLimit(format!(
            "document is {} bytes (limit {})",
            xml.len(),
            settings.max_file_bytes
        )));
    }
    into_extracted(xml.to_string(), settings)
}

/// Metadata and events only, without keeping the XML text
pub fn extract_from_xml(
    xml: &str,
    settings: &ExtractSettings,
) -> Result<(ScoreMetadata, Vec<MusicEvent>)> {
    let doc = XmlDocument::parse(xml, settings)?;
    let score = doc.score()?;
    let metadata = score.metadata();
    let events = extract_events(&score)?;
    Ok((metadata, events))
}

fn into_extracted(xml: String, settings: &ExtractSettings) -> Result<ExtractedScore> {
    let (metadata, events) = extract_from_xml(&xml, settings)?;
    Ok(ExtractedScore {
        metadata,
        events,
        raw_xml: xml,
    })
}
