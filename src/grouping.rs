//! Measure grouping for event reports
//!
//! Selects the events that fall inside a range of measures and buckets them
//! by measure number, ready for a per-measure listing.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::models::MusicEvent;

/// Events inside `measures`, keyed by measure number
///
/// Events without a measure number (pickups, unnumbered measures) are never
/// selected. Within each measure, events are ordered by instrument number;
/// events of the same instrument keep their extraction order.
pub fn group_by_measure(
    events: &[MusicEvent],
    measures: RangeInclusive<u32>,
) -> BTreeMap<u32, Vec<&MusicEvent>> {
    let mut grouped: BTreeMap<u32, Vec<&MusicEvent>> = BTreeMap::new();

    for event in events {
        if let Some(number) = event.measure_number {
            if measures.contains(&number) {
                grouped.entry(number).or_default().push(event);
            }
        }
    }

    for group in grouped.values_mut() {
        // sort_by_key is stable
        group.sort_by_key(|event| event.instrument_number);
    }

    grouped
}

/// Measures `1..=count`
pub fn first_measures(events: &[MusicEvent], count: u32) -> BTreeMap<u32, Vec<&MusicEvent>> {
    group_by_measure(events, 1..=count)
}
