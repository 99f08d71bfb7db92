//! Tests for report assembly and the supplementary checks

use super::*;
use crate::app::models::{SampleType, SourceInfo};
use crate::app::services::record_classifier::{ClassificationFailure, ClassifiedStream};
use crate::app::services::stream_validator::{validate_stream, FindingCategory, Severity};

fn stream(records: Vec<crate::app::models::ObservationRecord>) -> ClassifiedStream {
    ClassifiedStream {
        file_name: "export.txt".to_string(),
        source: SourceInfo {
            program_id: "AMBOPRIM8_1.151128".to_string(),
            setup_id: "AMBOPRIM8_DEC15".to_string(),
            tablet: "Samsung Tablet A".to_string(),
        },
        records,
        failures: Vec::new(),
    }
}

#[test]
fn test_clean_stream_produces_clean_report() {
    let report = validate_stream(&stream(clean_focal(2))).unwrap();
    assert!(report.is_clean());
    assert!(!report.has_errors());
    assert_eq!(report.summary.focal_headers, 1);
    assert_eq!(report.summary.points, 2);
    assert_eq!(report.summary.neighbors, 6);
    assert_eq!(report.summary.days, 1);
    assert_eq!(report.summary.observers, 1);
    assert_eq!(report.summary.first_record, Some(date().and_time(time("09:00:00"))));
    assert_eq!(report.summary.last_record, Some(date().and_time(time("09:02:30"))));
}

#[test]
fn test_duplicate_focals() {
    let mut records = clean_focal(2);
    let mut second = clean_focal(20);
    for record in &mut second {
        record.time = time("10:00:00") + (record.time - time("09:00:00"));
    }
    records.extend(second);

    let report = validate_stream(&stream(records)).unwrap();
    assert_eq!(report.count_for(FindingCategory::DuplicateFocals), 1);
    let finding = report.findings_in(FindingCategory::DuplicateFocals)[0];
    assert_eq!(finding.evidence.len(), 2);
}

#[test]
fn test_multiple_groups_per_day() {
    let mut records = vec![header(2, "09:00:00", "09:10:00", "UJU"), point(3, "09:01:00", "OOS")];
    let mut other_group = header(4, "09:30:00", "09:40:00", "VEE");
    if let crate::app::models::RecordDetail::FocalHeader(ref mut payload) = other_group.detail {
        payload.group = "NYA".to_string();
    }
    records.push(other_group);
    records.push(point(5, "09:31:00", "OOS"));

    let report = validate_stream(&stream(records)).unwrap();
    assert_eq!(report.count_for(FindingCategory::MultipleGroupsPerDay), 1);
}

#[test]
fn test_suspect_adlibs() {
    let mut records = clean_focal(2);
    records.push(adlib(11, "09:03:00", "VEE", "G", "VEE"));
    records.push(adlib(12, "09:04:00", "GAB", "G", "NULL"));

    let report = validate_stream(&stream(records)).unwrap();
    assert_eq!(report.count_for(FindingCategory::SelfDirectedAdlibs), 1);
    assert_eq!(report.count_for(FindingCategory::NullActeeAdlibs), 1);
}

#[test]
fn test_malformed_observers_reported_once_each() {
    let mut records = clean_focal(2);
    for record in &mut records {
        record.observer = "S2".to_string();
    }

    let report = validate_stream(&stream(records)).unwrap();
    assert_eq!(report.count_for(FindingCategory::MalformedObservers), 1);
}

#[test]
fn test_unresolved_catalog_codes_are_errors() {
    let mut records = clean_focal(2);
    records[0] = header_typed(2, "09:00:00", "09:10:00", "UJU", SampleType::Other("ADM".to_string()));
    records.push(point(11, "09:03:00", "RS"));
    records.push(neighbor(12, "09:03:10", "IMM", "N0"));
    records.push(neighbor(13, "09:03:20", "VEE", "N9"));
    records.push(neighbor(14, "09:03:30", "GAB", "N2"));

    let report = validate_stream(&stream(records)).unwrap();
    assert!(report.has_errors());
    assert_eq!(report.count_for(FindingCategory::UnresolvedCatalogCodes), 3);
    for finding in report.findings_in(FindingCategory::UnresolvedCatalogCodes) {
        assert_eq!(finding.severity, Severity::Error);
    }
}

#[test]
fn test_unclassified_records_surface_in_report() {
    let mut classified = stream(clean_focal(2));
    classified.failures.push(ClassificationFailure {
        line_no: 40,
        raw: "ZZZ\tSNS\t2015-09-22\t09:00:00".to_string(),
        message: "unrecognized record discriminator 'ZZZ'".to_string(),
    });

    let report = validate_stream(&classified).unwrap();
    assert_eq!(report.count_for(FindingCategory::UnclassifiedRecords), 1);
    assert_eq!(report.summary.unclassified, 1);
    assert!(report.has_errors());
}

#[test]
fn test_report_serializes_with_stable_category_ids() {
    let mut records = clean_focal(2);
    records.push(note(11, "09:30:00", "leaving"));

    let report = validate_stream(&stream(records)).unwrap();
    let json = report.to_json().unwrap();
    assert!(json.contains("notes-after-last-focal"));
    assert!(json.contains("\"severity\": \"warning\""));
}

#[test]
fn test_render_mentions_every_finding() {
    let mut records = clean_focal(2);
    records.push(note(11, "09:30:00", "leaving"));

    let report = validate_stream(&stream(records)).unwrap();
    let rendered = report.render();
    assert!(rendered.contains("notes-after-last-focal"));
    assert!(rendered.contains("line 11"));
}
