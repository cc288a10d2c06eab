//! Time bookkeeping for one part
//!
//! MusicXML moves a single cursor through each measure: notes push it
//! forward, `<backup>` pulls it back to lay another voice over the same span,
//! `<forward>` skips ahead. All positions here are quarter-note lengths from
//! the start of the part.
//!
//! Arithmetic is checked: denominators grow with every distinct
//! `<divisions>` value, and a result that no longer fits `i64` is reported
//! as `ResourceLimit` instead of wrapping.

use num_traits::{CheckedAdd, CheckedDiv, CheckedSub, Zero};

use crate::converters::musicxml::errors::{ExtractError, Result};
use crate::models::Rational;

fn overflow(operation: &str) -> ExtractError {
    ExtractError::ResourceLimit(format!(
        "{} overflows exact quarter-note arithmetic",
        operation
    ))
}

/// An enclosing `<measure>`
#[derive(Debug, Clone)]
struct MeasureFrame {
    number: Option<u32>,
    start: Rational,
    /// Furthest point any voice reached inside the measure
    high_water: Rational,
}

#[derive(Debug, Clone)]
pub(super) struct PartTimeline {
    /// Divisions per quarter note, from the latest `<divisions>`
    divisions: Rational,
    cursor: Rational,
    last_onset: Rational,
    measures: Vec<MeasureFrame>,
}

impl PartTimeline {
    pub fn new() -> Self {
        PartTimeline {
            divisions: Rational::from_integer(1),
            cursor: Rational::zero(),
            last_onset: Rational::zero(),
            measures: Vec::new(),
        }
    }

    pub fn set_divisions(&mut self, divisions: Rational) {
        self.divisions = divisions;
    }

    /// Convert a length in divisions to quarter notes
    pub fn quarter_length(&self, divisions: Rational) -> Result<Rational> {
        divisions
            .checked_div(&self.divisions)
            .ok_or_else(|| overflow("duration"))
    }

    pub fn cursor(&self) -> Rational {
        self.cursor
    }

    /// Onset of the most recent non-chord note
    pub fn last_onset(&self) -> Rational {
        self.last_onset
    }

    pub fn mark_onset(&mut self) {
        self.last_onset = self.cursor;
    }

    pub fn enter_measure(&mut self, number: Option<u32>) {
        self.measures.push(MeasureFrame {
            number,
            start: self.cursor,
            high_water: self.cursor,
        });
    }

    /// Close the innermost measure; the next one starts where its longest voice ended
    pub fn leave_measure(&mut self) {
        if let Some(frame) = self.measures.pop() {
            self.cursor = frame.high_water.max(self.cursor);
            self.last_onset = self.cursor;
            if let Some(outer) = self.measures.last_mut() {
                outer.high_water = outer.high_water.max(self.cursor);
            }
        }
    }

    /// Number of the innermost enclosing measure
    pub fn measure_number(&self) -> Option<u32> {
        self.measures.last().and_then(|frame| frame.number)
    }

    /// Start of the innermost enclosing measure (part start when outside any)
    pub fn measure_start(&self) -> Rational {
        self.measures
            .last()
            .map(|frame| frame.start)
            .unwrap_or_else(Rational::zero)
    }

    /// Position of `onset` from the start of the innermost measure
    pub fn measure_offset(&self, onset: Rational) -> Result<Rational> {
        onset
            .checked_sub(&self.measure_start())
            .ok_or_else(|| overflow("measure offset"))
    }

    pub fn advance(&mut self, length: Rational) -> Result<()> {
        self.cursor = self
            .cursor
            .checked_add(&length)
            .ok_or_else(|| overflow("part position"))?;
        if let Some(frame) = self.measures.last_mut() {
            frame.high_water = frame.high_water.max(self.cursor);
        }
        Ok(())
    }

    /// `<backup>`: never earlier than the start of the current measure
    pub fn back_up(&mut self, length: Rational) -> Result<()> {
        let target = self
            .cursor
            .checked_sub(&length)
            .ok_or_else(|| overflow("backup"))?;
        self.cursor = target.max(self.measure_start());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64) -> Rational {
        Rational::from_integer(n)
    }

    #[test]
    fn test_quarter_length_uses_divisions() {
        let mut timeline = PartTimeline::new();
        timeline.set_divisions(q(4));
        assert_eq!(timeline.quarter_length(q(2)).unwrap(), Rational::new(1, 2));
        assert_eq!(timeline.quarter_length(q(8)).unwrap(), q(2));
    }

    #[test]
    fn test_measure_starts_after_longest_voice() {
        let mut timeline = PartTimeline::new();
        timeline.enter_measure(Some(1));
        timeline.advance(q(4)).unwrap();
        timeline.back_up(q(4)).unwrap();
        timeline.advance(q(2)).unwrap();
        timeline.leave_measure();

        assert_eq!(timeline.cursor(), q(4));
        timeline.enter_measure(Some(2));
        assert_eq!(timeline.measure_start(), q(4));
        assert_eq!(timeline.measure_number(), Some(2));
    }

    #[test]
    fn test_back_up_clamps_to_measure_start() {
        let mut timeline = PartTimeline::new();
        timeline.enter_measure(Some(1));
        timeline.advance(q(4)).unwrap();
        timeline.leave_measure();
        timeline.enter_measure(Some(2));
        timeline.advance(q(1)).unwrap();
        timeline.back_up(q(10)).unwrap();
        assert_eq!(timeline.cursor(), q(4));
    }

    #[test]
    fn test_advance_overflow_is_resource_limit() {
        let mut timeline = PartTimeline::new();
        timeline.advance(Rational::new(1, i64::MAX - 1)).unwrap();
        let err = timeline.advance(Rational::new(1, i64::MAX - 2)).unwrap_err();
        assert!(matches!(err, ExtractError::ResourceLimit(_)));
    }

    #[test]
    fn test_measure_offset() {
        let mut timeline = PartTimeline::new();
        timeline.advance(q(3)).unwrap();
        timeline.enter_measure(Some(2));
        timeline.advance(Rational::new(1, 2)).unwrap();
        assert_eq!(timeline.measure_offset(timeline.cursor()).unwrap(), Rational::new(1, 2));
    }

    #[test]
    fn test_outside_measure_has_no_number() {
        let timeline = PartTimeline::new();
        assert_eq!(timeline.measure_number(), None);
        assert_eq!(timeline.measure_start(), Rational::zero());
    }
}
