//! Per-focal and per-point counting checks
//!
//! These checks walk the stream once, tracking the current focal and the
//! current point, and compare what was actually recorded against the
//! protocol's fixed expectations.

use std::collections::HashMap;

use crate::app::models::{ObservationRecord, RecordKind};
use crate::constants::{MAX_POINTS_PER_FOCAL, NEIGHBORS_PER_POINT, UNKNOWN_SNAMES};

use super::report::{Evidence, FindingCategory, ValidationFinding};

/// Count points (including out-of-sight points) under each focal header.
///
/// Keys are header line numbers. These counts double as each sample's
/// duration in minutes, so the emitter uses this same map.
pub fn point_counts(records: &[ObservationRecord]) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    let mut current_header: Option<usize> = None;

    for record in records {
        match record.kind() {
            RecordKind::FocalHeader => {
                counts.insert(record.line_no, 0);
                current_header = Some(record.line_no);
            }
            RecordKind::Point => {
                if let Some(header_line) = current_header {
                    if let Some(count) = counts.get_mut(&header_line) {
                        *count += 1;
                    }
                }
            }
            _ => {}
        }
    }

    counts
}

/// Focals whose point count exceeds the protocol maximum
pub fn focals_with_excess_points(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let counts = point_counts(records);

    records
        .iter()
        .filter(|record| record.kind() == RecordKind::FocalHeader)
        .filter_map(|header| {
            let count = counts.get(&header.line_no).copied().unwrap_or(0);
            if count > MAX_POINTS_PER_FOCAL {
                Some(ValidationFinding::new(
                    FindingCategory::FocalsWithExcessPoints,
                    format!(
                        "focal has {} points, more than the {} the protocol allows",
                        count, MAX_POINTS_PER_FOCAL
                    ),
                    vec![Evidence::from_record(header)],
                ))
            } else {
                None
            }
        })
        .collect()
}

/// Points whose neighbor count does not match the protocol.
///
/// In-sight points carry exactly [`NEIGHBORS_PER_POINT`] neighbor records;
/// out-of-sight points carry none.
pub fn points_with_miscounted_neighbors(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for (point, neighbors) in points_with_their_neighbors(records) {
        let out_of_sight = point
            .as_point()
            .map(|payload| payload.is_out_of_sight())
            .unwrap_or(false);
        let expected = if out_of_sight { 0 } else { NEIGHBORS_PER_POINT };

        if neighbors.len() != expected {
            findings.push(ValidationFinding::new(
                FindingCategory::PointsWithMiscountedNeighbors,
                format!(
                    "point has {} neighbor record(s), expected {}",
                    neighbors.len(),
                    expected
                ),
                vec![Evidence::from_record(point)],
            ));
        }
    }

    findings
}

/// Juvenile points whose neighbors repeat an individual.
///
/// Juveniles record their three nearest neighbors per point, so a repeated
/// sname within one point means the protocol was not followed. Placeholder
/// codes for unknown individuals may legitimately repeat.
pub fn juvenile_repeat_neighbors(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    let mut juvenile_focal = false;
    let mut point_open = false;

    let mut grouped: Vec<(&ObservationRecord, Vec<&ObservationRecord>)> = Vec::new();
    for record in records {
        match record.kind() {
            RecordKind::FocalHeader => {
                juvenile_focal = record
                    .as_focal_header()
                    .map(|header| header.sample_type.is_juvenile())
                    .unwrap_or(false);
                point_open = false;
            }
            RecordKind::Point if juvenile_focal => {
                grouped.push((record, Vec::new()));
                point_open = true;
            }
            RecordKind::Point => point_open = false,
            RecordKind::Neighbor if juvenile_focal && point_open => {
                if let Some((_, neighbors)) = grouped.last_mut() {
                    neighbors.push(record);
                }
            }
            _ => {}
        }
    }

    for (point, neighbors) in grouped {
        let mut seen: Vec<&str> = Vec::new();
        let mut repeats: Vec<&ObservationRecord> = Vec::new();

        for record in &neighbors {
            let Some(neighbor) = record.as_neighbor() else {
                continue;
            };
            if is_placeholder_sname(&neighbor.neighbor) {
                continue;
            }
            if seen.contains(&neighbor.neighbor.as_str()) {
                repeats.push(record);
            } else {
                seen.push(&neighbor.neighbor);
            }
        }

        if !repeats.is_empty() {
            let mut evidence = vec![Evidence::from_record(point)];
            evidence.extend(repeats.iter().map(|record| Evidence::from_record(record)));
            findings.push(ValidationFinding::new(
                FindingCategory::JuvenileRepeatNeighbors,
                "juvenile point repeats a neighbor individual",
                evidence,
            ));
        }
    }

    findings
}

/// Pair each point with the neighbor records that follow it, up to the next
/// point or header
fn points_with_their_neighbors(
    records: &[ObservationRecord],
) -> Vec<(&ObservationRecord, Vec<&ObservationRecord>)> {
    let mut grouped: Vec<(&ObservationRecord, Vec<&ObservationRecord>)> = Vec::new();
    let mut in_focal = false;
    let mut point_open = false;

    for record in records {
        match record.kind() {
            RecordKind::FocalHeader => {
                in_focal = true;
                point_open = false;
            }
            RecordKind::Point if in_focal => {
                grouped.push((record, Vec::new()));
                point_open = true;
            }
            RecordKind::Neighbor if point_open => {
                if let Some((_, neighbors)) = grouped.last_mut() {
                    neighbors.push(record);
                }
            }
            _ => {}
        }
    }

    grouped
}

/// Whether an sname is a placeholder for an unknown individual
pub fn is_placeholder_sname(sname: &str) -> bool {
    UNKNOWN_SNAMES.iter().any(|(code, _)| *code == sname)
}
