//! Ordered-companion scanning
//!
//! Several structural checks reduce to the same question about an ordered
//! record stream: "which records of kind T are not followed (or preceded) by
//! the companions they should have?". [`ScanRule`] captures one such question
//! declaratively and [`ScanRule::scan`] answers it in a single pass.
//!
//! A target record becomes a candidate when it appears. The candidate is
//! resolved at the next target, the next boundary record, or end of stream,
//! and is reported if none of the rule's `forbidden` kinds appeared while it
//! was pending. Rules with a `required` set work the other way around: a
//! target is only a candidate if none of the required kinds has appeared
//! since the last boundary, which catches records that arrive before the
//! companion that should precede them.

use crate::app::models::{ObservationRecord, RecordKind};
use crate::{Error, Result};

/// One declarative scan over the record stream
#[derive(Debug, Clone)]
pub struct ScanRule {
    /// The record kind being checked
    pub target: RecordKind,
    /// Kinds whose presence after a target clears it
    pub forbidden: Vec<RecordKind>,
    /// Kinds that must precede a target within the current boundary window
    pub required: Vec<RecordKind>,
    /// Kinds that close the current window and resolve any pending candidate
    pub boundary: Vec<RecordKind>,
}

impl ScanRule {
    /// Check the rule for internal contradictions
    ///
    /// A target that is its own forbidden companion can never be reported,
    /// and a kind that is both required and forbidden makes the rule
    /// unsatisfiable. Both are configuration mistakes, not data problems.
    pub fn validate(&self) -> Result<()> {
        if self.forbidden.contains(&self.target) {
            return Err(Error::configuration(format!(
                "scan rule target {} is also a forbidden companion",
                self.target
            )));
        }
        if self
            .required
            .iter()
            .any(|kind| self.forbidden.contains(kind))
        {
            return Err(Error::configuration(
                "scan rule has a kind that is both required and forbidden",
            ));
        }
        Ok(())
    }

    /// Scan the stream and return the target records the rule flags.
    ///
    /// `eligible` filters which target records can become candidates;
    /// ineligible targets still resolve the previous candidate.
    pub fn scan<'a, F>(
        &self,
        records: &'a [ObservationRecord],
        eligible: F,
    ) -> Result<Vec<&'a ObservationRecord>>
    where
        F: Fn(&ObservationRecord) -> bool,
    {
        self.validate()?;

        let mut flagged = Vec::new();
        let mut pending: Option<&ObservationRecord> = None;
        let mut forbidden_seen = false;
        let mut required_seen = false;

        for record in records {
            let kind = record.kind();

            if kind == self.target {
                if let Some(candidate) = pending.take() {
                    if !forbidden_seen {
                        flagged.push(candidate);
                    }
                }
                let required_satisfied = !self.required.is_empty() && required_seen;
                if eligible(record) && !required_satisfied {
                    pending = Some(record);
                    forbidden_seen = false;
                }
                continue;
            }

            if self.boundary.contains(&kind) {
                if let Some(candidate) = pending.take() {
                    if !forbidden_seen {
                        flagged.push(candidate);
                    }
                }
                required_seen = false;
                continue;
            }

            if self.forbidden.contains(&kind) {
                forbidden_seen = true;
            }
            if self.required.contains(&kind) {
                required_seen = true;
            }
        }

        if let Some(candidate) = pending {
            if !forbidden_seen {
                flagged.push(candidate);
            }
        }

        Ok(flagged)
    }
}

/// Focal headers with no data records of any kind before the next header
pub fn focals_without_data(records: &[ObservationRecord]) -> Result<Vec<&ObservationRecord>> {
    ScanRule {
        target: RecordKind::FocalHeader,
        forbidden: RecordKind::data_kinds().to_vec(),
        required: Vec::new(),
        boundary: Vec::new(),
    }
    .scan(records, |_| true)
}

/// Focal headers with no point records before the next header
pub fn focals_without_points(records: &[ObservationRecord]) -> Result<Vec<&ObservationRecord>> {
    ScanRule {
        target: RecordKind::FocalHeader,
        forbidden: vec![RecordKind::Point],
        required: Vec::new(),
        boundary: Vec::new(),
    }
    .scan(records, |_| true)
}

/// In-sight points with no neighbor records before the next point or header
///
/// Out-of-sight points legitimately have no neighbors and are never
/// candidates, though they still resolve the point before them.
pub fn points_without_neighbors(records: &[ObservationRecord]) -> Result<Vec<&ObservationRecord>> {
    ScanRule {
        target: RecordKind::Point,
        forbidden: vec![RecordKind::Neighbor],
        required: Vec::new(),
        boundary: vec![RecordKind::FocalHeader],
    }
    .scan(records, |record| {
        record
            .as_point()
            .map(|point| !point.is_out_of_sight())
            .unwrap_or(false)
    })
}

/// Neighbor records that arrive before any point in their focal
pub fn neighbors_before_points(records: &[ObservationRecord]) -> Result<Vec<&ObservationRecord>> {
    ScanRule {
        target: RecordKind::Neighbor,
        forbidden: Vec::new(),
        required: vec![RecordKind::Point],
        boundary: vec![RecordKind::FocalHeader],
    }
    .scan(records, |_| true)
}
