//! Validation findings and the observer-facing report
//!
//! Every check in this module family produces [`ValidationFinding`]s tagged
//! with a stable category identifier. Category identifiers are part of the
//! report format; renaming one breaks downstream tooling that filters on
//! them.

use chrono::NaiveDateTime;
use colored::Colorize;
use serde::Serialize;

use crate::app::models::{ObservationRecord, RecordKind, SourceInfo};
use crate::Result;

/// How serious a finding is for the eventual database import
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data is suspicious and should be reviewed, but can be imported
    Warning,
    /// Data cannot be imported as-is without correction
    Error,
}

/// Stable category for a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    FocalsWithoutData,
    FocalsWithoutPoints,
    PointsWithoutNeighbors,
    NeighborsBeforePoints,
    FocalsWithExcessPoints,
    PointsWithMiscountedNeighbors,
    JuvenileRepeatNeighbors,
    OverlappingFocals,
    NotesAfterLastFocal,
    NotesOnDaysWithoutFocals,
    DuplicateFocals,
    MultipleGroupsPerDay,
    SelfDirectedAdlibs,
    NullActeeAdlibs,
    MalformedObservers,
    UnclassifiedRecords,
    UnresolvedCatalogCodes,
}

impl FindingCategory {
    /// The stable kebab-case identifier used in reports
    pub fn id(self) -> &'static str {
        match self {
            Self::FocalsWithoutData => "focals-without-data",
            Self::FocalsWithoutPoints => "focals-without-points",
            Self::PointsWithoutNeighbors => "points-without-neighbors",
            Self::NeighborsBeforePoints => "neighbors-before-points",
            Self::FocalsWithExcessPoints => "focals-with-excess-points",
            Self::PointsWithMiscountedNeighbors => "points-with-miscounted-neighbors",
            Self::JuvenileRepeatNeighbors => "juvenile-repeat-neighbors",
            Self::OverlappingFocals => "overlapping-focals",
            Self::NotesAfterLastFocal => "notes-after-last-focal",
            Self::NotesOnDaysWithoutFocals => "notes-on-days-without-focals",
            Self::DuplicateFocals => "duplicate-focals",
            Self::MultipleGroupsPerDay => "multiple-groups-per-day",
            Self::SelfDirectedAdlibs => "self-directed-adlibs",
            Self::NullActeeAdlibs => "null-actee-adlibs",
            Self::MalformedObservers => "malformed-observers",
            Self::UnclassifiedRecords => "unclassified-records",
            Self::UnresolvedCatalogCodes => "unresolved-catalog-codes",
        }
    }

    /// Default severity for findings in this category
    pub fn severity(self) -> Severity {
        match self {
            Self::UnclassifiedRecords | Self::UnresolvedCatalogCodes => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A pointer back into the source file, attached to a finding as evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// 1-based line number in the source file
    pub line_no: usize,
    /// The raw line content
    pub raw: String,
}

impl Evidence {
    pub fn from_record(record: &ObservationRecord) -> Self {
        Self {
            line_no: record.line_no,
            raw: record.raw.clone(),
        }
    }
}

/// One validation finding: a category, a human-readable message, and the
/// source lines that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub message: String,
    pub evidence: Vec<Evidence>,
}

impl ValidationFinding {
    /// Build a finding with the category's default severity
    pub fn new(category: FindingCategory, message: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self {
            category,
            severity: category.severity(),
            message: message.into(),
            evidence,
        }
    }

    /// Build a finding whose evidence is a slice of records
    pub fn from_records(
        category: FindingCategory,
        message: impl Into<String>,
        records: &[&ObservationRecord],
    ) -> Self {
        Self::new(
            category,
            message,
            records.iter().map(|record| Evidence::from_record(record)).collect(),
        )
    }
}

/// Counts of what the stream contained, independent of any findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub records: usize,
    pub focal_headers: usize,
    pub points: usize,
    pub neighbors: usize,
    pub adlibs: usize,
    pub notes: usize,
    pub unclassified: usize,
    pub days: usize,
    pub observers: usize,
    /// Timestamp of the earliest record in the stream
    pub first_record: Option<NaiveDateTime>,
    /// Timestamp of the latest record in the stream
    pub last_record: Option<NaiveDateTime>,
}

impl DataSummary {
    /// Tally a classified record stream
    pub fn from_records(records: &[ObservationRecord], unclassified: usize) -> Self {
        let mut summary = Self {
            records: records.len(),
            unclassified,
            ..Self::default()
        };

        let mut days = std::collections::HashSet::new();
        let mut observers = std::collections::HashSet::new();
        for record in records {
            days.insert(record.date);
            observers.insert(record.observer.as_str());

            let at = record.timestamp();
            if summary.first_record.map_or(true, |first| at < first) {
                summary.first_record = Some(at);
            }
            if summary.last_record.map_or(true, |last| at > last) {
                summary.last_record = Some(at);
            }

            match record.kind() {
                RecordKind::FocalHeader => summary.focal_headers += 1,
                RecordKind::Point => summary.points += 1,
                RecordKind::Neighbor => summary.neighbors += 1,
                RecordKind::AdLib => summary.adlibs += 1,
                RecordKind::Note => summary.notes += 1,
            }
        }
        summary.days = days.len();
        summary.observers = observers.len();
        summary
    }
}

/// The full validation report for one export file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Name of the analyzed file
    pub file_name: String,
    /// Identity of the recording app and device
    pub source: SourceInfo,
    /// Counts of the stream's contents
    pub summary: DataSummary,
    /// All findings, grouped by check order
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// Whether the stream produced no findings at all
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether any finding is an error (not just a warning)
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::Error)
    }

    /// Number of findings in one category
    pub fn count_for(&self, category: FindingCategory) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.category == category)
            .count()
    }

    /// All findings in one category, in check order
    pub fn findings_in(&self, category: FindingCategory) -> Vec<&ValidationFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.category == category)
            .collect()
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report for terminal display
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}\n",
            "Validation Report".bold().underline()
        ));
        out.push_str(&format!(
            "  Generated {} for {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.file_name
        ));
        out.push_str(&format!(
            "  Source: {} / {} on {}\n",
            self.source.program_id, self.source.setup_id, self.source.tablet
        ));
        if let (Some(first), Some(last)) = (self.summary.first_record, self.summary.last_record) {
            out.push_str(&format!(
                "  Data from {} to {}\n",
                first.format("%Y-%m-%d %H:%M:%S"),
                last.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        out.push_str(&format!(
            "  {} records: {} focals, {} points, {} neighbors, {} ad-libs, {} notes\n",
            self.summary.records,
            self.summary.focal_headers,
            self.summary.points,
            self.summary.neighbors,
            self.summary.adlibs,
            self.summary.notes,
        ));
        out.push_str(&format!(
            "  {} days, {} observers, {} unclassifiable lines\n\n",
            self.summary.days, self.summary.observers, self.summary.unclassified
        ));

        if self.is_clean() {
            out.push_str(&format!("{}\n", "No findings.".green().bold()));
            return out;
        }

        for finding in &self.findings {
            let tag = match finding.severity {
                Severity::Warning => format!("[{}]", finding.category).yellow(),
                Severity::Error => format!("[{}]", finding.category).red().bold(),
            };
            out.push_str(&format!("{} {}\n", tag, finding.message));
            for evidence in &finding.evidence {
                out.push_str(&format!("    line {}: {}\n", evidence.line_no, evidence.raw));
            }
        }

        let warnings = self
            .findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count();
        let errors = self.findings.len() - warnings;
        out.push_str(&format!(
            "\n{} finding(s): {} warning(s), {} error(s)\n",
            self.findings.len(),
            warnings,
            errors
        ));

        out
    }
}
