//! Reading score files from disk
//!
//! A score is either a plain MusicXML document or a compressed `.mxl`
//! container: a zip archive whose `META-INF/container.xml` names the score
//! document inside it. Both are detected by content, not by file extension.

use std::io::{Cursor, Read};
use std::path::Path;

use log::debug;
use roxmltree::Document;
use zip::result::ZipError;
use zip::ZipArchive;

use super::errors::{ExtractError, Result};
use crate::settings::ExtractSettings;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// XML text of a score, ready for parsing
#[derive(Debug, Clone)]
pub struct ScoreSource {
    pub xml: String,
    /// True when the text came out of an `.mxl` archive
    pub compressed: bool,
}

/// Read a score file, unwrapping the compressed container when present
pub fn read_score_source(path: &Path, settings: &ExtractSettings) -> Result<ScoreSource> {
    let metadata = std::fs::metadata(path).map_err(|e| ExtractError::io(path, e))?;
    if metadata.len() > settings.max_file_bytes {
        return Err(ExtractError::ResourceLimit(format!(
            "{} is {} bytes (limit {})",
            path.display(),
            metadata.len(),
            settings.max_file_bytes
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    source_from_bytes(bytes, settings)
}

/// Same as [`read_score_source`] for bytes already in memory
pub fn source_from_bytes(bytes: Vec<u8>, settings: &ExtractSettings) -> Result<ScoreSource> {
    if bytes.len() as u64 > settings.max_file_bytes {
        return Err(ExtractError::ResourceLimit(format!(
            "input is {} bytes (limit {})",
            bytes.len(),
            settings.max_file_bytes
        )));
    }

    if bytes.starts_with(ZIP_MAGIC) {
        let xml = read_mxl_archive(bytes, settings)?;
        return Ok(ScoreSource {
            xml,
            compressed: true,
        });
    }

    Ok(ScoreSource {
        xml: decode_xml_bytes(&bytes)?,
        compressed: false,
    })
}

/// Decode XML bytes (UTF-8, or UTF-16 with a byte order mark)
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| ExtractError::Parse(format!("document is not valid UTF-8: {}", e)))?;
            Ok(text.trim_start_matches('\u{feff}').to_string())
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(ExtractError::Parse(
            "UTF-16 document has an odd number of bytes".to_string(),
        ));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units)
        .map_err(|e| ExtractError::Parse(format!("document is not valid UTF-16: {}", e)))
}

fn read_mxl_archive(bytes: Vec<u8>, settings: &ExtractSettings) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::archive("cannot read central directory", e))?;

    let rootfile = match read_archive_entry(&mut archive, CONTAINER_PATH, settings)? {
        Some(container_xml) => rootfile_path(&container_xml),
        None => None,
    };

    if let Some(path) = rootfile {
        debug!("mxl rootfile: {}", path);
        if let Some(xml) = read_archive_entry(&mut archive, &path, settings)? {
            return Ok(xml);
        }
    }

    // No usable container manifest: take the first score-looking entry
    let fallback = archive
        .file_names()
        .filter(|name| !name.starts_with("META-INF/"))
        .find(|name| name.ends_with(".xml") || name.ends_with(".musicxml"))
        .map(str::to_string);

    if let Some(path) = fallback {
        debug!("mxl fallback entry: {}", path);
        if let Some(xml) = read_archive_entry(&mut archive, &path, settings)? {
            return Ok(xml);
        }
    }

    Err(ExtractError::Format(
        "compressed score contains no MusicXML document".to_string(),
    ))
}

/// `full-path` of the first `<rootfile>` in `META-INF/container.xml`
fn rootfile_path(container_xml: &str) -> Option<String> {
    let doc = Document::parse(container_xml).ok()?;
    doc.descendants()
        .find(|node| node.has_tag_name("rootfile"))
        .and_then(|node| node.attribute("full-path"))
        .map(str::to_string)
}

fn read_archive_entry(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    name: &str,
    settings: &ExtractSettings,
) -> Result<Option<String>> {
    let entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(ExtractError::archive(format!("cannot open {}", name), e))
        }
    };

    let limit = settings.max_file_bytes;
    if entry.size() > limit {
        return Err(ExtractError::ResourceLimit(format!(
            "{} in .mxl archive is {} bytes uncompressed (limit {})",
            name,
            entry.size(),
            limit
        )));
    }

    // The declared size can lie; never inflate more than the limit
    let mut bytes = Vec::new();
    entry
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::archive(format!("cannot inflate {}", name), ZipError::Io(e)))?;

    if bytes.len() as u64 > limit {
        return Err(ExtractError::ResourceLimit(format!(
            "{} in .mxl archive exceeds {} bytes",
            name, limit
        )));
    }

    decode_xml_bytes(&bytes).map(Some)
}
