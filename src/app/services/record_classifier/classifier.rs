//! Line-to-record classification
//!
//! One tab-delimited line becomes one [`ObservationRecord`]. The kind is
//! chosen by a fixed discriminator table; unknown discriminators and
//! malformed fields are per-record classification errors, fatal for the
//! record but never for the run.
//!
//! Field layouts, from the export writer:
//!
//! ```text
//! HDR  observer date time group sname stype end_time
//! PNT  observer date time group focal activity [foodcode]
//! NGH  observer date time group focal act neighbor [ncode]
//! ADL  observer date time group actor act actee [modifier]
//! TXT  observer date time text...
//! ```

use crate::app::models::{
    AdLib, FocalHeader, Neighbor, Note, ObservationRecord, Point, RecordDetail, RecordKind,
    SampleType,
};
use crate::{Error, Result};

use super::field_parsers::{optional_field, parse_date, parse_time, required_field};

/// Classify one split line into a typed observation record
///
/// `line_no` is the 1-based line number in the source file, used in error
/// messages and kept on the record for report evidence.
pub fn classify_fields(fields: &[String], line_no: usize) -> Result<ObservationRecord> {
    let discriminator = required_field(fields, 0, "discriminator", line_no)?;
    let kind = RecordKind::from_discriminator(discriminator).ok_or_else(|| {
        Error::classification(
            line_no,
            format!("unrecognized record discriminator '{}'", discriminator),
        )
    })?;

    let observer = required_field(fields, 1, "observer", line_no)?.to_string();
    let date = parse_date(required_field(fields, 2, "date", line_no)?, line_no)?;
    let time = parse_time(required_field(fields, 3, "time", line_no)?, line_no)?;

    let detail = match kind {
        RecordKind::FocalHeader => classify_header(fields, line_no)?,
        RecordKind::Point => classify_point(fields, line_no)?,
        RecordKind::Neighbor => classify_neighbor(fields, line_no)?,
        RecordKind::AdLib => classify_adlib(fields, line_no)?,
        RecordKind::Note => classify_note(fields, line_no)?,
    };

    Ok(ObservationRecord {
        line_no,
        observer,
        date,
        time,
        detail,
        raw: fields.join("\t"),
    })
}

fn classify_header(fields: &[String], line_no: usize) -> Result<RecordDetail> {
    let group = required_field(fields, 4, "group", line_no)?.to_string();
    let focal = required_field(fields, 5, "sname", line_no)?.to_string();
    let sample_type = SampleType::from_code(required_field(fields, 6, "stype", line_no)?);
    let end_time = parse_time(required_field(fields, 7, "end time", line_no)?, line_no)?;

    Ok(RecordDetail::FocalHeader(FocalHeader {
        group,
        focal,
        sample_type,
        end_time,
    }))
}

fn classify_point(fields: &[String], line_no: usize) -> Result<RecordDetail> {
    let activity = required_field(fields, 6, "activity", line_no)?.to_string();

    // A food code only travels with feeding activities, in a trailing field
    // of its own.
    let point = Point {
        foodcode: if activity.starts_with(crate::constants::FEEDING_ACTIVITY) && fields.len() > 7 {
            optional_field(fields, fields.len() - 1)
        } else {
            None
        },
        activity,
    };

    Ok(RecordDetail::Point(point))
}

fn classify_neighbor(fields: &[String], line_no: usize) -> Result<RecordDetail> {
    let neighbor = required_field(fields, 7, "neighbor", line_no)?.to_string();

    // The ncode is the last field. When observers omit it, this falls back
    // to the neighbor field itself; the mistranslation surfaces as an import
    // error downstream rather than silently dropping the row.
    let ncode = required_field(fields, fields.len() - 1, "ncode", line_no)?.to_string();

    Ok(RecordDetail::Neighbor(Neighbor { neighbor, ncode }))
}

fn classify_adlib(fields: &[String], line_no: usize) -> Result<RecordDetail> {
    let group = required_field(fields, 4, "group", line_no)?.to_string();
    let actor = required_field(fields, 5, "actor", line_no)?.to_string();
    let act = required_field(fields, 6, "act", line_no)?.to_string();
    let actee = required_field(fields, 7, "actee", line_no)?.to_string();
    let modifier = optional_field(fields, 8);

    Ok(RecordDetail::AdLib(AdLib {
        group,
        actor,
        act,
        actee,
        modifier,
    }))
}

fn classify_note(fields: &[String], line_no: usize) -> Result<RecordDetail> {
    if fields.len() < 5 {
        return Err(Error::classification(line_no, "note record has no text"));
    }

    // Tabs inside the note text were split apart with the rest of the line;
    // rejoin whatever remains.
    let text = fields[4..].join("\t").trim().to_string();

    Ok(RecordDetail::Note(Note { text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn split(line: &str) -> Vec<String> {
        line.split('\t').map(|field| field.to_string()).collect()
    }

    #[test]
    fn test_classify_header() {
        let record =
            classify_fields(&split("HDR\tSNS\t2015-09-22\t08:59:56\tACA\tUJU\tJUV\t09:10:39"), 2)
                .unwrap();

        assert_eq!(record.kind(), RecordKind::FocalHeader);
        assert_eq!(record.observer, "SNS");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2015, 9, 22).unwrap());
        assert_eq!(record.time, NaiveTime::from_hms_opt(8, 59, 56).unwrap());

        let header = record.as_focal_header().unwrap();
        assert_eq!(header.group, "ACA");
        assert_eq!(header.focal, "UJU");
        assert_eq!(header.sample_type, SampleType::Juvenile);
        assert_eq!(header.end_time, NaiveTime::from_hms_opt(9, 10, 39).unwrap());
    }

    #[test]
    fn test_classify_point_with_foodcode() {
        let record =
            classify_fields(&split("PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tFS\tGRC"), 3)
                .unwrap();
        let point = record.as_point().unwrap();
        assert_eq!(point.activity, "FS");
        assert_eq!(point.foodcode.as_deref(), Some("GRC"));
    }

    #[test]
    fn test_classify_point_without_foodcode() {
        let record =
            classify_fields(&split("PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tRS"), 3).unwrap();
        let point = record.as_point().unwrap();
        assert_eq!(point.activity, "RS");
        assert_eq!(point.foodcode, None);

        // Non-feeding activity never picks up a trailing field as food
        let record =
            classify_fields(&split("PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tOOS"), 4).unwrap();
        assert!(record.as_point().unwrap().is_out_of_sight());
    }

    #[test]
    fn test_classify_neighbor() {
        let record = classify_fields(
            &split("NGH\tSNS\t2015-09-22\t09:01:10\tACA\tUJU\tproximity\tVEE\tN0"),
            4,
        )
        .unwrap();
        let neighbor = record.as_neighbor().unwrap();
        assert_eq!(neighbor.neighbor, "VEE");
        assert_eq!(neighbor.ncode, "N0");
    }

    #[test]
    fn test_classify_neighbor_with_omitted_ncode() {
        let record = classify_fields(
            &split("NGH\tSNS\t2015-09-22\t09:01:10\tACA\tUJU\tproximity\tVEE"),
            4,
        )
        .unwrap();
        let neighbor = record.as_neighbor().unwrap();
        assert_eq!(neighbor.neighbor, "VEE");
        assert_eq!(neighbor.ncode, "VEE");
    }

    #[test]
    fn test_classify_adlib() {
        let record = classify_fields(
            &split("ADL\tSNS\t2015-09-22\t10:15:00\tACA\tVEE\tG\tUJU"),
            5,
        )
        .unwrap();
        let adlib = record.as_adlib().unwrap();
        assert_eq!(adlib.actor, "VEE");
        assert_eq!(adlib.act, "G");
        assert_eq!(adlib.actee, "UJU");
        assert_eq!(adlib.modifier, None);
    }

    #[test]
    fn test_classify_note_rejoins_tabs() {
        let record = classify_fields(
            &split("TXT\tSNS\t2015-09-22\t10:20:00\tgroup moved\tnorth"),
            6,
        )
        .unwrap();
        assert_eq!(record.as_note().unwrap().text, "group moved\tnorth");
    }

    #[test]
    fn test_unknown_discriminator() {
        let err = classify_fields(&split("XYZ\tSNS\t2015-09-22\t10:20:00"), 7).unwrap_err();
        assert!(err.is_per_record());
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_malformed_fields_are_per_record() {
        // Bad time
        let err =
            classify_fields(&split("HDR\tSNS\t2015-09-22\tlate\tACA\tUJU\tJUV\t09:10:39"), 2)
                .unwrap_err();
        assert!(err.is_per_record());

        // Truncated header
        let err = classify_fields(&split("HDR\tSNS\t2015-09-22\t08:59:56\tACA"), 2).unwrap_err();
        assert!(err.is_per_record());
    }
}
