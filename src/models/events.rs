//! Musical events extracted from a score
//!
//! One `MusicEvent` per sounding note or chord. Times are exact rationals in
//! quarter-note units (a quarter note lasts 1).

use num_rational::Rational64;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Quarter-note length, kept exact (triplets stay 1/3, not 0.333...)
pub type Rational = Rational64;

/// Whether an event is a single pitch or a simultaneous group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Note,
    Chord,
}

/// Where and when an event sounds, shared by notes and chords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPlacement {
    pub instrument_number: u32,
    pub instrument_name: String,
    pub offset: Rational,
    pub duration: Rational,
    pub part_offset: Rational,
    pub measure_number: Option<u32>,
    pub voice: Option<String>,
}

/// A note or chord event
///
/// `pitch` is set for `EventKind::Note` and `pitches` for `EventKind::Chord`,
/// never both. Build events through [`MusicEvent::note`] and
/// [`MusicEvent::chord`] to keep that pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicEvent {
    /// 1-based position of the part in the document
    pub instrument_number: u32,
    pub instrument_name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub pitch: Option<String>,
    pub pitches: Option<Vec<String>>,
    /// Position from the start of the enclosing measure
    pub offset: Rational,
    pub duration: Rational,
    /// Position from the start of the part
    pub part_offset: Rational,
    #[serde(rename = "measure")]
    pub measure_number: Option<u32>,
    pub voice: Option<String>,
}

impl MusicEvent {
    pub fn note(placement: EventPlacement, pitch: String) -> Self {
        Self::build(placement, EventKind::Note, Some(pitch), None)
    }

    /// Event for pitches sounding together, in document order
    ///
    /// With no `rest` pitches the group collapses to a note.
    pub fn chord(placement: EventPlacement, first: String, rest: Vec<String>) -> Self {
        if rest.is_empty() {
            return Self::note(placement, first);
        }
        let mut pitches = Vec::with_capacity(rest.len() + 1);
        pitches.push(first);
        pitches.extend(rest);
        Self::build(placement, EventKind::Chord, None, Some(pitches))
    }

    fn build(
        placement: EventPlacement,
        kind: EventKind,
        pitch: Option<String>,
        pitches: Option<Vec<String>>,
    ) -> Self {
        Self {
            instrument_number: placement.instrument_number,
            instrument_name: placement.instrument_name,
            kind,
            pitch,
            pitches,
            offset: placement.offset,
            duration: placement.duration,
            part_offset: placement.part_offset,
            measure_number: placement.measure_number,
            voice: placement.voice,
        }
    }

    /// True when exactly the field matching `kind` is populated
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            EventKind::Note => self.pitch.is_some() && self.pitches.is_none(),
            EventKind::Chord => {
                self.pitch.is_none() && self.pitches.as_ref().is_some_and(|p| !p.is_empty())
            }
        }
    }

    /// Human-readable pitch column: `C4` or `Chord: [E4, G4]`
    pub fn pitch_label(&self) -> String {
        match (&self.pitch, &self.pitches) {
            (Some(pitch), _) => pitch.clone(),
            (None, Some(pitches)) => format!("Chord: [{}]", pitches.join(", ")),
            (None, None) => String::new(),
        }
    }
}

/// Format a quarter-note length for display
///
/// Whole values print as `1.0`, terminating decimals as `0.75`, anything else
/// as a fraction (`1/3`).
pub fn format_quarter_length(value: Rational) -> String {
    if value.is_integer() {
        return format!("{}.0", value.to_integer());
    }

    let mut denom = *value.denom();
    while denom % 2 == 0 {
        denom /= 2;
    }
    while denom % 5 == 0 {
        denom /= 5;
    }

    if denom == 1 {
        format!("{}", value.to_f64().unwrap_or(0.0))
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}
