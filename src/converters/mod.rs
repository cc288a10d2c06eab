//! Format converters
//!
//! This module contains the readers that turn notation files into the
//! crate's data model.

pub mod musicxml;

// Re-export for convenience
pub use musicxml::{
    extract_score_bytes, extract_score_file, extract_score_str, ExtractError, Result,
};
