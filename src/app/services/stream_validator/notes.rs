//! Associating free-form notes with focal samples
//!
//! A note belongs to the focal sample whose window contains it. Notes taken
//! between samples belong to the next sample that starts that day; notes
//! that no same-day sample can claim are reported and never emitted.
//!
//! The association is deterministic and single-pass: days are processed in
//! date order, and within a day the time-sorted headers and notes are merged
//! in one sweep. A header cursor only ever moves forward, so the whole
//! association is one ordered walk over the sorted data.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::app::models::{ObservationRecord, RecordKind};

use super::report::{Evidence, FindingCategory, ValidationFinding};

/// The outcome of note association for one stream
#[derive(Debug, Clone, Default)]
pub struct NoteBindings {
    /// Note line number -> header line number, for every bound note
    pub bound: HashMap<usize, usize>,

    /// Header line number -> notes (in time order) that were taken before
    /// the header started. These cannot be emitted at their stream position;
    /// the emitter writes them right after the owning sample instead.
    pub deferred_by_header: HashMap<usize, Vec<usize>>,

    /// Notes no same-day sample could claim. Never emitted.
    pub unbound: Vec<usize>,

    /// Findings for the unbound notes
    pub findings: Vec<ValidationFinding>,
}

impl NoteBindings {
    /// Whether a note is bound to the sample whose window contains it
    /// (and so emits at its stream position)
    pub fn is_contained(&self, note_line: usize) -> bool {
        self.bound.contains_key(&note_line)
            && !self
                .deferred_by_header
                .values()
                .any(|notes| notes.contains(&note_line))
    }
}

/// Bind every note in the stream to a focal sample, or report it
pub fn associate_notes(records: &[ObservationRecord]) -> NoteBindings {
    let mut days: BTreeMap<NaiveDate, (Vec<&ObservationRecord>, Vec<&ObservationRecord>)> =
        BTreeMap::new();

    for record in records {
        let entry = days.entry(record.date).or_default();
        match record.kind() {
            RecordKind::FocalHeader => entry.0.push(record),
            RecordKind::Note => entry.1.push(record),
            _ => {}
        }
    }

    let mut bindings = NoteBindings::default();

    for (_, (mut headers, mut notes)) in days {
        headers.sort_by_key(|header| (header.timestamp(), header.line_no));
        notes.sort_by_key(|note| (note.timestamp(), note.line_no));

        if headers.is_empty() {
            for note in notes {
                bindings.unbound.push(note.line_no);
                bindings.findings.push(ValidationFinding::new(
                    FindingCategory::NotesOnDaysWithoutFocals,
                    format!("note on {} with no focal samples that day", note.date),
                    vec![Evidence::from_record(note)],
                ));
            }
            continue;
        }

        // Merged sweep: notes arrive in time order, the header cursor only
        // advances, and `started` holds the samples whose windows opened
        // before the current note, in start order.
        let mut next_header = 0usize;
        let mut started: Vec<&ObservationRecord> = Vec::new();

        for note in notes {
            let moment = note.timestamp();

            while next_header < headers.len() && headers[next_header].timestamp() <= moment {
                started.push(headers[next_header]);
                next_header += 1;
            }

            // A started sample whose window already closed can never claim
            // this note or any later one.
            while started
                .last()
                .map_or(false, |header| !header.window_contains(moment))
            {
                started.pop();
            }

            // A note inside a sample window belongs to the most recently
            // started sample containing it.
            if let Some(header) = started.last() {
                bindings.bound.insert(note.line_no, header.line_no);
                continue;
            }

            // Otherwise the note waits for the next sample to start.
            if let Some(header) = headers.get(next_header) {
                bindings.bound.insert(note.line_no, header.line_no);
                bindings
                    .deferred_by_header
                    .entry(header.line_no)
                    .or_default()
                    .push(note.line_no);
                continue;
            }

            bindings.unbound.push(note.line_no);
            bindings.findings.push(ValidationFinding::new(
                FindingCategory::NotesAfterLastFocal,
                format!("note at {} falls after the day's last focal sample", note.time),
                vec![Evidence::from_record(note)],
            ));
        }
    }

    bindings
}
