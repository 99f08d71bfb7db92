//! Tests for SQL emission
//!
//! Record builders are shared with the stream-validator tests; these files
//! cover catalog resolution and the emitter's ordering rules. Statement and
//! transaction shapes are tested next to their builders.

pub mod catalog_tests;

use crate::app::models::{ObservationRecord, SourceInfo};
use crate::app::services::record_classifier::ClassifiedStream;

pub use crate::app::services::stream_validator::tests::{
    adlib, clean_focal, header, header_typed, neighbor, note, point,
};

pub fn stream(records: Vec<ObservationRecord>) -> ClassifiedStream {
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
