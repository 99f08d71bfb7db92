//! Stream validation for classified observation records
//!
//! This module family checks a classified record stream against the sampling
//! protocol and produces a [`ValidationReport`]:
//! - [`window`] - declarative ordered-companion scans (focals without data,
//!   points without neighbors, and friends)
//! - [`counters`] - per-focal and per-point counting checks
//! - [`overlap`] - overlapping focal samples
//! - [`notes`] - note-to-sample association and stray-note reporting
//! - [`report`] - finding categories, evidence, and report rendering
//!
//! Validation never mutates the stream and never stops the run; everything
//! it discovers becomes a finding in the report, and emission decides
//! separately what it can and cannot write.

pub mod counters;
pub mod notes;
pub mod overlap;
pub mod report;
pub mod window;

#[cfg(test)]
pub mod tests;

pub use notes::{associate_notes, NoteBindings};
pub use report::{
    DataSummary, Evidence, FindingCategory, Severity, ValidationFinding, ValidationReport,
};
pub use window::ScanRule;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::app::models::{ObservationRecord, RecordKind};
use crate::app::services::record_classifier::ClassifiedStream;
use crate::constants::{neighbor_codes, OBSERVER_CODE_LEN, UNNAMED_CODES};
use crate::Result;

/// Run every check against a classified stream and assemble the report
pub fn validate_stream(stream: &ClassifiedStream) -> Result<ValidationReport> {
    let records = &stream.records;
    let mut findings = Vec::new();

    debug!(records = records.len(), "validating record stream");

    for header in window::focals_without_data(records)? {
        findings.push(ValidationFinding::new(
            FindingCategory::FocalsWithoutData,
            "focal sample has no data records at all",
            vec![Evidence::from_record(header)],
        ));
    }
    for header in window::focals_without_points(records)? {
        findings.push(ValidationFinding::new(
            FindingCategory::FocalsWithoutPoints,
            "focal sample has no point records",
            vec![Evidence::from_record(header)],
        ));
    }
    for point in window::points_without_neighbors(records)? {
        findings.push(ValidationFinding::new(
            FindingCategory::PointsWithoutNeighbors,
            "in-sight point has no neighbor records",
            vec![Evidence::from_record(point)],
        ));
    }
    for neighbor in window::neighbors_before_points(records)? {
        findings.push(ValidationFinding::new(
            FindingCategory::NeighborsBeforePoints,
            "neighbor record arrives before any point in its focal",
            vec![Evidence::from_record(neighbor)],
        ));
    }

    findings.extend(counters::focals_with_excess_points(records));
    findings.extend(counters::points_with_miscounted_neighbors(records));
    findings.extend(counters::juvenile_repeat_neighbors(records));
    findings.extend(overlap::overlapping_focals(records));
    findings.extend(associate_notes(records).findings);

    findings.extend(duplicate_focals(records));
    findings.extend(multiple_groups_per_day(records));
    findings.extend(suspect_adlibs(records));
    findings.extend(malformed_observers(records));
    findings.extend(unresolved_catalog_codes(records));

    for failure in &stream.failures {
        findings.push(ValidationFinding::new(
            FindingCategory::UnclassifiedRecords,
            failure.message.clone(),
            vec![Evidence {
                line_no: failure.line_no,
                raw: failure.raw.clone(),
            }],
        ));
    }

    let report = ValidationReport {
        file_name: stream.file_name.clone(),
        source: stream.source.clone(),
        summary: DataSummary::from_records(records, stream.failures.len()),
        findings,
    };

    info!(
        findings = report.findings.len(),
        clean = report.is_clean(),
        "validation complete"
    );

    Ok(report)
}

/// The same individual focal-sampled more than once on one day
fn duplicate_focals(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut by_focal: BTreeMap<(NaiveDate, &str), Vec<&ObservationRecord>> = BTreeMap::new();

    for record in records {
        if let Some(header) = record.as_focal_header() {
            by_focal
                .entry((record.date, header.focal.as_str()))
                .or_default()
                .push(record);
        }
    }

    by_focal
        .into_iter()
        .filter(|(_, headers)| headers.len() > 1)
        .map(|((date, focal), headers)| {
            ValidationFinding::from_records(
                FindingCategory::DuplicateFocals,
                format!("{} was focal-sampled {} times on {}", focal, headers.len(), date),
                &headers,
            )
        })
        .collect()
}

/// More than one group sampled on the same day
///
/// One export comes from one tablet following one group, so a second group
/// usually means a typo in the group field.
fn multiple_groups_per_day(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ObservationRecord>> = BTreeMap::new();

    for record in records {
        if record.as_focal_header().is_some() {
            by_day.entry(record.date).or_default().push(record);
        }
    }

    by_day
        .into_iter()
        .filter_map(|(date, headers)| {
            let mut groups: Vec<&str> = Vec::new();
            let mut first_of_group: Vec<&ObservationRecord> = Vec::new();
            for header in headers {
                let group = header.as_focal_header().map(|payload| payload.group.as_str());
                if let Some(group) = group {
                    if !groups.contains(&group) {
                        groups.push(group);
                        first_of_group.push(header);
                    }
                }
            }
            if groups.len() > 1 {
                Some(ValidationFinding::from_records(
                    FindingCategory::MultipleGroupsPerDay,
                    format!("{} groups sampled on {}: {}", groups.len(), date, groups.join(", ")),
                    &first_of_group,
                ))
            } else {
                None
            }
        })
        .collect()
}

/// Ad-libs that interact with themselves or with nobody
fn suspect_adlibs(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for record in records {
        let Some(adlib) = record.as_adlib() else {
            continue;
        };
        if adlib.is_self_directed() {
            findings.push(ValidationFinding::new(
                FindingCategory::SelfDirectedAdlibs,
                format!("{} recorded interacting with itself", adlib.actor),
                vec![Evidence::from_record(record)],
            ));
        }
        if adlib.has_null_actee() {
            findings.push(ValidationFinding::new(
                FindingCategory::NullActeeAdlibs,
                format!("interaction by {} has no actee", adlib.actor),
                vec![Evidence::from_record(record)],
            ));
        }
    }

    findings
}

/// Observer initials that are not three letters
fn malformed_observers(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut seen: Vec<&str> = Vec::new();
    let mut findings = Vec::new();

    for record in records {
        let observer = record.observer.as_str();
        if seen.contains(&observer) {
            continue;
        }
        seen.push(observer);

        let well_formed = observer.len() == OBSERVER_CODE_LEN
            && observer.chars().all(|character| character.is_ascii_alphabetic());
        if !well_formed {
            findings.push(ValidationFinding::new(
                FindingCategory::MalformedObservers,
                format!("observer code '{}' is not three letters", observer),
                vec![Evidence::from_record(record)],
            ));
        }
    }

    findings
}

/// Codes the database catalogs cannot resolve.
///
/// These must be corrected before upload: the emitted SQL would either fail
/// its lookup subquery or insert a meaningless value.
fn unresolved_catalog_codes(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for record in records {
        match record.kind() {
            RecordKind::FocalHeader => {
                if let Some(header) = record.as_focal_header() {
                    if header.sample_type.stype().is_none() {
                        findings.push(ValidationFinding::new(
                            FindingCategory::UnresolvedCatalogCodes,
                            format!("unrecognized sample type '{}'", header.sample_type.code()),
                            vec![Evidence::from_record(record)],
                        ));
                    }
                }
            }
            RecordKind::Neighbor => {
                if let Some(neighbor) = record.as_neighbor() {
                    if !neighbor_codes::EXPORT_CODES.contains(&neighbor.ncode.as_str()) {
                        findings.push(ValidationFinding::new(
                            FindingCategory::UnresolvedCatalogCodes,
                            format!("unrecognized neighbor code '{}'", neighbor.ncode),
                            vec![Evidence::from_record(record)],
                        ));
                    }
                    if UNNAMED_CODES.contains(&neighbor.neighbor.as_str()) {
                        findings.push(ValidationFinding::new(
                            FindingCategory::UnresolvedCatalogCodes,
                            format!(
                                "neighbor '{}' is an unnamed-individual code and needs correction",
                                neighbor.neighbor
                            ),
                            vec![Evidence::from_record(record)],
                        ));
                    }
                }
            }
            RecordKind::AdLib => {
                if let Some(adlib) = record.as_adlib() {
                    for sname in [adlib.actor.as_str(), adlib.actee.as_str()] {
                        if UNNAMED_CODES.contains(&sname) {
                            findings.push(ValidationFinding::new(
                                FindingCategory::UnresolvedCatalogCodes,
                                format!(
                                    "'{}' is an unnamed-individual code and needs correction",
                                    sname
                                ),
                                vec![Evidence::from_record(record)],
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    findings
}
