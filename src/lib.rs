//! Prim8 Processor Library
//!
//! A Rust library for validating Prim8 field-observation exports and
//! generating SQL import transactions for a Babase-style relational store.
//!
//! This library provides tools for:
//! - Classifying tab-delimited observation records into typed variants
//! - Scanning the record stream for structural anomalies (missing points,
//!   miscounted neighbors, overlapping focal samples, orphaned notes)
//! - Aggregating findings into a structured, human-auditable report
//! - Emitting an ordered SQL statement stream whose child rows reference
//!   their parents through sequence-implicit (`currval`-style) links
//! - Wrapping the statement stream in a single all-or-nothing transaction

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod record_classifier;
        pub mod sql_writer;
        pub mod stream_validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ObservationRecord, RecordKind, SampleType, SourceInfo};
pub use app::services::stream_validator::report::ValidationReport;
pub use config::Config;

/// Result type alias for the Prim8 processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for Prim8 processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV-level read error on the tab-delimited input
    #[error("Record read error in file '{file}': {message}")]
    RecordRead {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A single record could not be classified (recoverable per record)
    #[error("Classification error at line {line}: {message}")]
    Classification { line: usize, message: String },

    /// Export file format error (bad metadata line, empty file)
    #[error("Export format error in file '{file}': {message}")]
    ExportFormat { file: String, message: String },

    /// Configuration error (CLI arguments, scan-rule definitions)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Report serialization error
    #[error("Report serialization error: {message}")]
    ReportSerialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a record read error with context
    pub fn record_read(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::RecordRead {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a per-record classification error
    pub fn classification(line: usize, message: impl Into<String>) -> Self {
        Self::Classification {
            line,
            message: message.into(),
        }
    }

    /// Create an export format error
    pub fn export_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExportFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Check whether this error is a recoverable per-record failure
    pub fn is_per_record(&self) -> bool {
        matches!(self, Self::Classification { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::RecordRead {
            file: "unknown".to_string(),
            message: "Record read failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::ReportSerialization {
            message: "Report serialization failed".to_string(),
            source: error,
        }
    }
}
