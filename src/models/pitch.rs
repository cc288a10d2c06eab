//! Spelled pitch model
//!
//! A MusicXML `<pitch>` is a diatonic step, an optional chromatic alteration
//! and an octave. Pitches are spelled as step + accidental + octave
//! (`C4`, `F#5`, `B-3`, `E--2`), using `-` for flats so that the accidental
//! never collides with the step letter `B`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diatonic step (the letter name of a pitch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Parse a MusicXML `<step>` value
    pub fn from_musicxml(text: &str) -> Option<Step> {
        match text.trim() {
            "C" => Some(Step::C),
            "D" => Some(Step::D),
            "E" => Some(Step::E),
            "F" => Some(Step::F),
            "G" => Some(Step::G),
            "A" => Some(Step::A),
            "B" => Some(Step::B),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Step::C => 'C',
            Step::D => 'D',
            Step::E => 'E',
            Step::F => 'F',
            Step::G => 'G',
            Step::A => 'A',
            Step::B => 'B',
        }
    }
}

/// A pitch as written in the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpelledPitch {
    pub step: Step,
    /// Chromatic alteration in quarter tones (2 = sharp, -2 = flat, 1 = half sharp)
    pub alter_quarter_tones: i8,
    pub octave: i8,
}

impl SpelledPitch {
    pub fn new(step: Step, alter_quarter_tones: i8, octave: i8) -> Self {
        Self {
            step,
            alter_quarter_tones,
            octave,
        }
    }

    /// Convert a MusicXML `<alter>` value (semitones, may be fractional) to quarter tones
    pub fn quarter_tones_from_alter(alter: f64) -> i8 {
        (alter * 2.0).round().clamp(i8::MIN as f64, i8::MAX as f64) as i8
    }

    /// Accidental suffix for this pitch's alteration
    pub fn accidental(&self) -> String {
        accidental_symbol(self.alter_quarter_tones)
    }
}

impl fmt::Display for SpelledPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.step.letter(), self.accidental(), self.octave)
    }
}

/// Accidental symbol for an alteration in quarter tones
///
/// Whole semitones repeat `#` / `-`; a leftover quarter tone is written `~`
/// (up) or `` ` `` (down).
pub fn accidental_symbol(quarter_tones: i8) -> String {
    let semitones = quarter_tones / 2;
    let remainder = quarter_tones % 2;

    let mut symbol = if semitones >= 0 {
        "#".repeat(semitones as usize)
    } else {
        "-".repeat(semitones.unsigned_abs() as usize)
    };

    match remainder {
        1 => symbol.push('~'),
        -1 => symbol.push('`'),
        _ => {}
    }

    symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_naturals() {
        assert_eq!(SpelledPitch::new(Step::C, 0, 4).to_string(), "C4");
        assert_eq!(SpelledPitch::new(Step::B, 0, 3).to_string(), "B3");
    }

    #[test]
    fn test_spell_accidentals() {
        assert_eq!(SpelledPitch::new(Step::C, 2, 4).to_string(), "C#4");
        assert_eq!(SpelledPitch::new(Step::B, -2, 4).to_string(), "B-4");
        assert_eq!(SpelledPitch::new(Step::F, 4, 5).to_string(), "F##5");
        assert_eq!(SpelledPitch::new(Step::E, -4, 2).to_string(), "E--2");
    }

    #[test]
    fn test_spell_quarter_tones() {
        assert_eq!(SpelledPitch::new(Step::D, 1, 4).to_string(), "D~4");
        assert_eq!(SpelledPitch::new(Step::D, -1, 4).to_string(), "D`4");
        assert_eq!(SpelledPitch::new(Step::G, 3, 4).to_string(), "G#~4");
        assert_eq!(SpelledPitch::new(Step::G, -3, 4).to_string(), "G-`4");
    }

    #[test]
    fn test_negative_octave() {
        assert_eq!(SpelledPitch::new(Step::A, 0, -1).to_string(), "A-1");
    }

    #[test]
    fn test_quarter_tones_from_alter() {
        assert_eq!(SpelledPitch::quarter_tones_from_alter(1.0), 2);
        assert_eq!(SpelledPitch::quarter_tones_from_alter(-1.0), -2);
        assert_eq!(SpelledPitch::quarter_tones_from_alter(-0.5), -1);
        assert_eq!(SpelledPitch::quarter_tones_from_alter(0.0), 0);
    }

    #[test]
    fn test_step_from_musicxml() {
        assert_eq!(Step::from_musicxml("G"), Some(Step::G));
        assert_eq!(Step::from_musicxml(" A "), Some(Step::A));
        assert_eq!(Step::from_musicxml("H"), None);
    }
}
