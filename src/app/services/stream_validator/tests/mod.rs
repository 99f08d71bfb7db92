//! Tests for the stream validator
//!
//! Shared record builders live here; each check has its own test file.

pub mod note_tests;
pub mod validator_tests;

use chrono::{NaiveDate, NaiveTime};

use crate::app::models::{
    AdLib, FocalHeader, Neighbor, Note, ObservationRecord, Point, RecordDetail, SampleType,
};

pub const TEST_DATE: (i32, u32, u32) = (2015, 9, 22);

pub fn date() -> NaiveDate {
    let (year, month, day) = TEST_DATE;
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M:%S").unwrap()
}

fn record(line_no: usize, at: &str, detail: RecordDetail, raw: &str) -> ObservationRecord {
    ObservationRecord {
        line_no,
        observer: "SNS".to_string(),
        date: date(),
        time: time(at),
        detail,
        raw: raw.to_string(),
    }
}

pub fn header(line_no: usize, at: &str, end: &str, focal: &str) -> ObservationRecord {
    header_typed(line_no, at, end, focal, SampleType::Juvenile)
}

pub fn header_typed(
    line_no: usize,
    at: &str,
    end: &str,
    focal: &str,
    sample_type: SampleType,
) -> ObservationRecord {
    record(
        line_no,
        at,
        RecordDetail::FocalHeader(FocalHeader {
            group: "ACA".to_string(),
            focal: focal.to_string(),
            sample_type,
            end_time: time(end),
        }),
        &format!("HDR\tSNS\t2015-09-22\t{}\tACA\t{}\tJUV\t{}", at, focal, end),
    )
}

pub fn point(line_no: usize, at: &str, activity: &str) -> ObservationRecord {
    record(
        line_no,
        at,
        RecordDetail::Point(Point {
            activity: activity.to_string(),
            foodcode: None,
        }),
        &format!("PNT\tSNS\t2015-09-22\t{}\tACA\tUJU\t{}", at, activity),
    )
}

pub fn neighbor(line_no: usize, at: &str, sname: &str, ncode: &str) -> ObservationRecord {
    record(
        line_no,
        at,
        RecordDetail::Neighbor(Neighbor {
            neighbor: sname.to_string(),
            ncode: ncode.to_string(),
        }),
        &format!("NGH\tSNS\t2015-09-22\t{}\tACA\tUJU\tproximity\t{}\t{}", at, sname, ncode),
    )
}

pub fn adlib(line_no: usize, at: &str, actor: &str, act: &str, actee: &str) -> ObservationRecord {
    record(
        line_no,
        at,
        RecordDetail::AdLib(AdLib {
            group: "ACA".to_string(),
            actor: actor.to_string(),
            act: act.to_string(),
            actee: actee.to_string(),
            modifier: None,
        }),
        &format!("ADL\tSNS\t2015-09-22\t{}\tACA\t{}\t{}\t{}", at, actor, act, actee),
    )
}

pub fn note(line_no: usize, at: &str, text: &str) -> ObservationRecord {
    record(
        line_no,
        at,
        RecordDetail::Note(Note {
            text: text.to_string(),
        }),
        &format!("TXT\tSNS\t2015-09-22\t{}\t{}", at, text),
    )
}

/// A complete, protocol-clean focal: header, two points, three neighbors each
pub fn clean_focal(start_line: usize) -> Vec<ObservationRecord> {
    vec![
        header(start_line, "09:00:00", "09:10:00", "UJU"),
        point(start_line + 1, "09:01:00", "RS"),
        neighbor(start_line + 2, "09:01:10", "VEE", "N0"),
        neighbor(start_line + 3, "09:01:20", "GAB", "N1"),
        neighbor(start_line + 4, "09:01:30", "HOB", "N2"),
        point(start_line + 5, "09:02:00", "WS"),
        neighbor(start_line + 6, "09:02:10", "VEE", "N0"),
        neighbor(start_line + 7, "09:02:20", "GAB", "N1"),
        neighbor(start_line + 8, "09:02:30", "HOB", "N2"),
    ]
}
