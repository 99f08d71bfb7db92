//! Overlapping-focal detection
//!
//! Two focal samples on the same day overlap when the later one starts
//! strictly inside the earlier one's window. Only one observer and one
//! tablet produce a given export, so overlap always means a sample was
//! closed late or opened early.

use crate::app::models::{ObservationRecord, RecordKind};

use super::report::{Evidence, FindingCategory, ValidationFinding};

/// Report each overlapping pair of focal headers exactly once.
///
/// Pairs are reported in stream order of the earlier header. A focal that
/// overlaps several others produces one finding per pair. Self-overlaps
/// (the same individual sampled twice in overlapping windows) are reported
/// like any other pair.
pub fn overlapping_focals(records: &[ObservationRecord]) -> Vec<ValidationFinding> {
    let headers: Vec<&ObservationRecord> = records
        .iter()
        .filter(|record| record.kind() == RecordKind::FocalHeader)
        .collect();

    let mut findings = Vec::new();

    for (index, earlier) in headers.iter().enumerate() {
        let Some(end) = earlier.focal_end() else {
            continue;
        };

        for later in &headers[index + 1..] {
            if later.date != earlier.date {
                continue;
            }
            let start = later.timestamp();
            if start > earlier.timestamp() && start < end {
                findings.push(ValidationFinding::new(
                    FindingCategory::OverlappingFocals,
                    format!(
                        "focal starting {} overlaps the focal starting {}",
                        later.time, earlier.time
                    ),
                    vec![Evidence::from_record(earlier), Evidence::from_record(later)],
                ));
            }
        }
    }

    findings
}
