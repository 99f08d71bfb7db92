//! Field-level parsing helpers for export records
//!
//! These helpers keep positional indexing and format handling in one place;
//! everything downstream works with named accessors on the typed records.

use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime};

/// Extract a required field by position, trimmed
pub fn required_field<'a>(fields: &'a [String], index: usize, name: &str, line_no: usize) -> Result<&'a str> {
    fields
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::classification(line_no, format!("missing required field '{}'", name))
        })
}

/// Extract an optional trailing field by position, trimmed
pub fn optional_field(fields: &[String], index: usize) -> Option<String> {
    fields
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

/// Parse a `yyyy-mm-dd` date field
pub fn parse_date(value: &str, line_no: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::classification(line_no, format!("invalid date '{}', expected yyyy-mm-dd", value))
    })
}

/// Parse an `hh:mm:ss` time field
pub fn parse_time(value: &str, line_no: usize) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        Error::classification(line_no, format!("invalid time '{}', expected hh:mm:ss", value))
    })
}
