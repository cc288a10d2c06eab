//! Models module for the score extractor
//!
//! Plain data produced by one extraction pass: score metadata, part
//! references, spelled pitches and note/chord events.

pub mod events;
pub mod pitch;
pub mod score;

// Re-export commonly used types
pub use events::{format_quarter_length, EventKind, EventPlacement, MusicEvent, Rational};
pub use pitch::{SpelledPitch, Step};
pub use score::{
    ExtractedScore, PartRef, PropertyNode, ScoreMetadata, UNKNOWN_COMPOSER, UNKNOWN_PART_NAME,
    UNKNOWN_TITLE,
};
