//! Record classification for processed Prim8 exports
//!
//! This module turns the tab-delimited export into typed records:
//! - [`field_parsers`] - shared field-level parsing helpers
//! - [`classifier`] - one line -> one [`ObservationRecord`]
//! - [`reader`] - whole-file reading, metadata line handling, and
//!   collection of per-record classification failures
//!
//! Classification failures are recoverable per record: the offending line is
//! excluded from validation and emission and surfaced in the report, but the
//! run continues.
//!
//! [`ObservationRecord`]: crate::app::models::ObservationRecord

pub mod classifier;
pub mod field_parsers;
pub mod reader;

pub use classifier::classify_fields;
pub use reader::{ClassificationFailure, ClassifiedStream, parse_export, read_export};
