//! Export-file reading and metadata handling
//!
//! A processed export opens with a single metadata line identifying the
//! recording app, setup version, and capture device, followed by one
//! tab-delimited observation per line. Reading collects classification
//! failures instead of aborting: a failed line is surfaced in the report and
//! excluded from everything downstream.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::models::{ObservationRecord, SourceInfo};
use crate::constants::METADATA_LINE_PREFIX;
use crate::{Error, Result};

use super::classifier::classify_fields;

/// A record that failed classification, kept for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationFailure {
    /// 1-based line number in the source file
    pub line_no: usize,
    /// The raw line content
    pub raw: String,
    /// Why classification failed
    pub message: String,
}

/// A fully read export: source metadata, classified records, and failures
#[derive(Debug, Clone)]
pub struct ClassifiedStream {
    /// Name of the file the stream was read from, for report headers
    pub file_name: String,
    /// Identity of the recording app and device
    pub source: SourceInfo,
    /// Classified records in file order
    pub records: Vec<ObservationRecord>,
    /// Lines that could not be classified
    pub failures: Vec<ClassificationFailure>,
}

/// Read and classify an export file
pub fn read_export(path: &Path) -> Result<ClassifiedStream> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let content = fs::read_to_string(path)
        .map_err(|source| Error::io(format!("failed to read {}", path.display()), source))?;

    parse_export(&content, &path.display().to_string())
}

/// Classify export content already held in memory
///
/// `file_name` is carried for error context and report headers.
pub fn parse_export(content: &str, file_name: &str) -> Result<ClassifiedStream> {
    let mut lines = content.lines();

    let metadata_line = lines
        .next()
        .ok_or_else(|| Error::export_format(file_name, "file is empty"))?;
    let source = parse_metadata_line(metadata_line, file_name)?;
    debug!(
        program = %source.program_id,
        setup = %source.setup_id,
        tablet = %source.tablet,
        "parsed export metadata"
    );

    // The remainder is tab-delimited observation data. Record widths vary by
    // kind, so the reader must be flexible.
    let body: String = content
        .splitn(2, '\n')
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut failures = Vec::new();

    for (offset, row) in reader.records().enumerate() {
        let row = row.map_err(|source| {
            let line = source
                .position()
                .map(|position| position.line() as usize + 1)
                .unwrap_or(offset + 2);
            Error::record_read(file_name, format!("unreadable row at line {}", line), Some(source))
        })?;

        // The reader counts lines within the body, which starts at file
        // line 2; its position survives the empty lines csv skips.
        let line_no = row
            .position()
            .map(|position| position.line() as usize + 1)
            .unwrap_or(offset + 2);

        let fields: Vec<String> = row.iter().map(|field| field.to_string()).collect();
        if fields.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        match classify_fields(&fields, line_no) {
            Ok(record) => records.push(record),
            Err(Error::Classification { line, message }) => {
                warn!(line, %message, "excluding unclassifiable record");
                failures.push(ClassificationFailure {
                    line_no: line,
                    raw: fields.join("\t"),
                    message,
                });
            }
            Err(other) => return Err(other),
        }
    }

    debug!(
        records = records.len(),
        failures = failures.len(),
        "classified export"
    );

    Ok(ClassifiedStream {
        file_name: file_name.to_string(),
        source,
        records,
        failures,
    })
}

/// Parse the metadata line:
/// `Parsed data from: PROGRAMID, SETUPID, TABLET-DESCRIPTION`
pub fn parse_metadata_line(line: &str, file_name: &str) -> Result<SourceInfo> {
    if !line.trim_start().starts_with(METADATA_LINE_PREFIX) {
        return Err(Error::export_format(
            file_name,
            format!("expected metadata line starting with '{}'", METADATA_LINE_PREFIX),
        ));
    }

    // Split on the first colon only, in case a field carries one.
    let after_prefix = line
        .splitn(2, ':')
        .nth(1)
        .ok_or_else(|| Error::export_format(file_name, "malformed metadata line"))?;

    let parts: Vec<&str> = after_prefix.split(',').map(|part| part.trim()).collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(Error::export_format(
            file_name,
            "metadata line must name program, setup, and tablet",
        ));
    }

    Ok(SourceInfo {
        program_id: parts[0].to_string(),
        setup_id: parts[1].to_string(),
        tablet: parts[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::RecordKind;

    const SAMPLE: &str = "\
Parsed data from: AMBOPRIM8_1.151128, AMBOPRIM8_DEC15, Samsung Tablet A
HDR\tSNS\t2015-09-22\t08:59:56\tACA\tUJU\tJUV\t09:10:39
PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tRS
NGH\tSNS\t2015-09-22\t09:01:10\tACA\tUJU\tproximity\tVEE\tN0
TXT\tSNS\t2015-09-22\t09:05:00\tgroup moved north
";

    #[test]
    fn test_parse_metadata_line() {
        let source = parse_metadata_line(
            "Parsed data from: AMBOPRIM8_1.151128, AMBOPRIM8_DEC15, Samsung Tablet A",
            "test.txt",
        )
        .unwrap();
        assert_eq!(source.program_id, "AMBOPRIM8_1.151128");
        assert_eq!(source.setup_id, "AMBOPRIM8_DEC15");
        assert_eq!(source.tablet, "Samsung Tablet A");
    }

    #[test]
    fn test_parse_metadata_line_rejects_garbage() {
        assert!(parse_metadata_line("HDR\tSNS\t2015-09-22", "test.txt").is_err());
        assert!(parse_metadata_line("Parsed data from: only-one-field", "test.txt").is_err());
    }

    #[test]
    fn test_parse_export() {
        let stream = parse_export(SAMPLE, "test.txt").unwrap();
        assert_eq!(stream.records.len(), 4);
        assert!(stream.failures.is_empty());
        assert_eq!(stream.records[0].kind(), RecordKind::FocalHeader);
        assert_eq!(stream.records[0].line_no, 2);
        assert_eq!(stream.records[3].kind(), RecordKind::Note);
        assert_eq!(stream.records[3].line_no, 5);
    }

    #[test]
    fn test_parse_export_collects_failures() {
        let content = "\
Parsed data from: AMBOPRIM8_1.151128, AMBOPRIM8_DEC15, Samsung Tablet A
HDR\tSNS\t2015-09-22\t08:59:56\tACA\tUJU\tJUV\t09:10:39
ZZZ\tSNS\t2015-09-22\t09:00:00\tACA
PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tRS
";
        let stream = parse_export(content, "test.txt").unwrap();
        assert_eq!(stream.records.len(), 2);
        assert_eq!(stream.failures.len(), 1);
        assert_eq!(stream.failures[0].line_no, 3);
        assert!(stream.failures[0].message.contains("ZZZ"));
    }

    #[test]
    fn test_parse_export_requires_metadata() {
        let content = "HDR\tSNS\t2015-09-22\t08:59:56\tACA\tUJU\tJUV\t09:10:39\n";
        assert!(parse_export(content, "test.txt").is_err());
        assert!(parse_export("", "test.txt").is_err());
    }

    #[test]
    fn test_parse_export_skips_blank_lines() {
        let content = "\
Parsed data from: AMBOPRIM8_1.151128, AMBOPRIM8_DEC15, Samsung Tablet A
HDR\tSNS\t2015-09-22\t08:59:56\tACA\tUJU\tJUV\t09:10:39

PNT\tSNS\t2015-09-22\t09:01:00\tACA\tUJU\tRS
";
        let stream = parse_export(content, "test.txt").unwrap();
        assert_eq!(stream.records.len(), 2);
        // The blank line still counts toward line numbers, so evidence
        // points at the right row.
        assert_eq!(stream.records[0].line_no, 2);
        assert_eq!(stream.records[1].line_no, 4);
    }
}
