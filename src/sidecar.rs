//! Sidecar lookup: the MusicXML file that accompanies a PDF score

use std::path::{Path, PathBuf};

use log::debug;

/// Extensions tried, in order
pub const SIDECAR_EXTENSIONS: [&str; 2] = ["xml", "musicxml"];

/// Find `<stem>.xml` or `<stem>.musicxml` next to `pdf_path`
///
/// Only regular files count. Returns `None` when neither exists.
pub fn find_sidecar_musicxml(pdf_path: &Path) -> Option<PathBuf> {
    let found = SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| pdf_path.with_extension(ext))
        .find(|candidate| candidate.is_file());

    match &found {
        Some(path) => debug!("sidecar for {}: {}", pdf_path.display(), path.display()),
        None => debug!("no sidecar for {}", pdf_path.display()),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_xml_over_musicxml() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("overture.pdf");
        fs::write(&pdf, b"%PDF").unwrap();
        fs::write(dir.path().join("overture.xml"), "<score-partwise/>").unwrap();
        fs::write(dir.path().join("overture.musicxml"), "<score-partwise/>").unwrap();

        assert_eq!(find_sidecar_musicxml(&pdf), Some(dir.path().join("overture.xml")));
    }

    #[test]
    fn test_falls_back_to_musicxml() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("etude.pdf");
        fs::write(dir.path().join("etude.musicxml"), "<score-partwise/>").unwrap();

        assert_eq!(find_sidecar_musicxml(&pdf), Some(dir.path().join("etude.musicxml")));
    }

    #[test]
    fn test_none_when_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_sidecar_musicxml(&dir.path().join("lonely.pdf")), None);
    }

    #[test]
    fn test_directory_is_not_a_sidecar() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("odd.xml")).unwrap();
        assert_eq!(find_sidecar_musicxml(&dir.path().join("odd.pdf")), None);
    }
}
