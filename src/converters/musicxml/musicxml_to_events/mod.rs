//! MusicXML to event list
//!
//! Walks every `<part>` of a part-wise score and emits one [`MusicEvent`] per
//! sounding note or chord, in document order.
//!
//! # Timing
//!
//! ```text
//! <measure number="1">          push measure frame (start = cursor)
//!   <attributes><divisions>     duration scale for the rest of the part
//!   <note>                      onset = cursor, cursor += duration
//!   <note><chord/>              joins the previous note's onset
//!   <backup> / <forward>        move cursor for the next voice
//! </measure>                    pop frame, cursor = furthest voice end
//! ```
//!
//! Rests and unpitched notes only move the cursor. Grace notes sound for
//! zero time and leave the cursor where it is.

mod timeline;

use log::{debug, warn};
use num_traits::Zero;
use roxmltree::Node;

use super::errors::{ExtractError, Result};
use super::parser::{
    get_child, parse_divisions, parse_duration_child, MeasureNode, NoteNode, ScoreNode,
};
use crate::models::{EventPlacement, MusicEvent, Rational};
use timeline::PartTimeline;

/// Extract note and chord events from every part of a score
pub fn extract_events(score: &ScoreNode) -> Result<Vec<MusicEvent>> {
    let mut events = Vec::new();

    for (index, part) in score.parts().into_iter().enumerate() {
        let instrument_number = (index + 1) as u32;
        let part_id = part.id().unwrap_or_default();

        let instrument_name = match score.part_name(part_id) {
            Some(name) => name,
            None => {
                if !score.extract_part_refs().iter().any(|p| p.id == part_id) {
                    warn!("part '{}' is not declared in <part-list>", part_id);
                }
                format!("Part {}", instrument_number)
            }
        };

        let mut walker = PartWalker::new(instrument_number, instrument_name);
        walker.walk(part.children())?;
        let part_events = walker.finish();

        debug!(
            "part {} ('{}'): {} events",
            instrument_number,
            part_id,
            part_events.len()
        );
        events.extend(part_events);
    }

    Ok(events)
}

/// Notes collected for one onset, emitted as a note or a chord
struct PendingGroup {
    placement: EventPlacement,
    first: String,
    rest: Vec<String>,
}

/// Event builder for a single part
struct PartWalker {
    instrument_number: u32,
    instrument_name: String,
    timeline: PartTimeline,
    pending: Option<PendingGroup>,
    events: Vec<MusicEvent>,
}

impl PartWalker {
    fn new(instrument_number: u32, instrument_name: String) -> Self {
        PartWalker {
            instrument_number,
            instrument_name,
            timeline: PartTimeline::new(),
            pending: None,
            events: Vec::new(),
        }
    }

    fn walk<'a, 'input: 'a>(
        &mut self,
        children: impl Iterator<Item = Node<'a, 'input>>,
    ) -> Result<()> {
        for child in children {
            match child.tag_name().name() {
                "measure" => self.measure(MeasureNode::new(child))?,
                "attributes" => {
                    if let Some(divisions) = get_child(child, "divisions") {
                        self.timeline.set_divisions(parse_divisions(divisions)?);
                    }
                }
                "note" => self.note(NoteNode::new(child))?,
                "backup" => {
                    let length = self.element_length(child, "backup")?;
                    self.timeline.back_up(length)?;
                }
                "forward" => {
                    let length = self.element_length(child, "forward")?;
                    self.timeline.advance(length)?;
                }
                _ => {
                    // print, direction, barline, harmony, ... carry no sounding notes
                }
            }
        }
        Ok(())
    }

    fn measure(&mut self, measure: MeasureNode) -> Result<()> {
        let number = measure.number();
        if number.is_none() {
            if let Some(raw) = measure.number_attr() {
                debug!("measure number '{}' has no positive numeric part", raw);
            }
        }

        self.flush();
        self.timeline.enter_measure(number);
        self.walk(measure.children())?;
        self.flush();
        self.timeline.leave_measure();
        Ok(())
    }

    fn note(&mut self, note: NoteNode) -> Result<()> {
        let pitch = if note.is_rest() { None } else { note.pitch()? };

        if note.is_chord_member() {
            let Some(pitch) = pitch else {
                return Ok(());
            };
            match self.pending.as_mut() {
                Some(group) => group.rest.push(pitch.to_string()),
                None => {
                    // Chord tone after a rest: sound it at the rest's onset
                    let length = self.note_length(note)?;
                    let onset = self.timeline.last_onset();
                    self.pending = Some(PendingGroup {
                        placement: self.placement(onset, length, note.voice())?,
                        first: pitch.to_string(),
                        rest: Vec::new(),
                    });
                }
            }
            return Ok(());
        }

        self.flush();
        let length = self.note_length(note)?;
        let onset = self.timeline.cursor();
        self.timeline.mark_onset();

        if let Some(pitch) = pitch {
            self.pending = Some(PendingGroup {
                placement: self.placement(onset, length, note.voice())?,
                first: pitch.to_string(),
                rest: Vec::new(),
            });
        }

        self.timeline.advance(length)
    }

    /// Sounding length in quarter notes; grace notes take no time
    fn note_length(&self, note: NoteNode) -> Result<Rational> {
        if note.is_grace() {
            return Ok(Rational::zero());
        }
        match note.duration_divisions()? {
            Some(divisions) => self.timeline.quarter_length(divisions),
            None => Err(ExtractError::missing_element("duration", "<note>")),
        }
    }

    /// Length of a `<backup>` or `<forward>`
    fn element_length(&self, node: Node, element: &str) -> Result<Rational> {
        let divisions = parse_duration_child(node, element)?;
        self.timeline.quarter_length(divisions)
    }

    fn placement(
        &self,
        onset: Rational,
        length: Rational,
        voice: Option<String>,
    ) -> Result<EventPlacement> {
        Ok(EventPlacement {
            instrument_number: self.instrument_number,
            instrument_name: self.instrument_name.clone(),
            offset: self.timeline.measure_offset(onset)?,
            duration: length,
            part_offset: onset,
            measure_number: self.timeline.measure_number(),
            voice,
        })
    }

    fn flush(&mut self) {
        if let Some(group) = self.pending.take() {
            self.events
                .push(MusicEvent::chord(group.placement, group.first, group.rest));
        }
    }

    fn finish(mut self) -> Vec<MusicEvent> {
        self.flush();
        self.events
    }
}
