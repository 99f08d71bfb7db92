//! Data models for Prim8 processing
//!
//! This module contains the core data structures for representing field
//! observations read from a processed Prim8 export. Each tab-delimited line
//! becomes an [`ObservationRecord`] whose kind-specific payload is a tagged
//! variant; all field access goes through named accessors so that positional
//! indexing never leaks out of the classifier.

use crate::constants::{self, sample_types};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

// =============================================================================
// Source Metadata
// =============================================================================

/// Identity of the recording app and device, from the export's metadata line
///
/// The first line of every processed export reads
/// `Parsed data from: PROGRAMID, SETUPID, TABLET-DESCRIPTION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    /// Program identifier string (e.g. "AMBOPRIM8_1.151128")
    pub program_id: String,

    /// Setup identifier string (e.g. "AMBOPRIM8_DEC15")
    pub setup_id: String,

    /// Collection-device description (e.g. "Samsung Tablet A")
    pub tablet: String,
}

// =============================================================================
// Record Kinds
// =============================================================================

/// The five record kinds present in a processed export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    /// Begins a new focal sample
    FocalHeader,
    /// Point sample within a focal
    Point,
    /// Neighbor observation attached to a point
    Neighbor,
    /// Ad-lib / all-occurrences interaction
    AdLib,
    /// Free-form text note
    Note,
}

impl RecordKind {
    /// Map a line discriminator onto a record kind
    pub fn from_discriminator(code: &str) -> Option<Self> {
        use constants::discriminators;
        match code {
            discriminators::FOCAL => Some(Self::FocalHeader),
            discriminators::POINT => Some(Self::Point),
            discriminators::NEIGHBOR => Some(Self::Neighbor),
            discriminators::ADLIB => Some(Self::AdLib),
            discriminators::NOTE => Some(Self::Note),
            _ => None,
        }
    }

    /// The discriminator code for this kind
    pub fn discriminator(self) -> &'static str {
        use constants::discriminators;
        match self {
            Self::FocalHeader => discriminators::FOCAL,
            Self::Point => discriminators::POINT,
            Self::Neighbor => discriminators::NEIGHBOR,
            Self::AdLib => discriminators::ADLIB,
            Self::Note => discriminators::NOTE,
        }
    }

    /// All kinds that carry observation data (everything but the header)
    pub fn data_kinds() -> [RecordKind; 4] {
        [Self::Point, Self::Neighbor, Self::AdLib, Self::Note]
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.discriminator())
    }
}

// =============================================================================
// Sample Types
// =============================================================================

/// Sampling protocol in effect for a focal sample
///
/// The protocol changes neighbor-code semantics: adult females rank neighbors
/// by category, juveniles by distance, so repeated neighbor identities are
/// valid for adult females but indicate a protocol mix-up for juveniles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SampleType {
    AdultFemale,
    Juvenile,
    /// Unrecognized protocol code; only occurs when something went wrong
    /// upstream. Retained verbatim so it can be flagged rather than dropped.
    Other(String),
}

impl SampleType {
    /// Parse the export's protocol code
    pub fn from_code(code: &str) -> Self {
        match code {
            sample_types::ADULT_FEMALE => Self::AdultFemale,
            sample_types::JUVENILE => Self::Juvenile,
            other => Self::Other(other.to_string()),
        }
    }

    /// The database stype value, if this protocol has one
    pub fn stype(&self) -> Option<&'static str> {
        match self {
            Self::AdultFemale => Some(sample_types::ADULT_FEMALE_STYPE),
            Self::Juvenile => Some(sample_types::JUVENILE_STYPE),
            Self::Other(_) => None,
        }
    }

    /// The code as it appeared in the export
    pub fn code(&self) -> &str {
        match self {
            Self::AdultFemale => sample_types::ADULT_FEMALE,
            Self::Juvenile => sample_types::JUVENILE,
            Self::Other(code) => code,
        }
    }

    pub fn is_juvenile(&self) -> bool {
        matches!(self, Self::Juvenile)
    }
}

// =============================================================================
// Kind-Specific Payloads
// =============================================================================

/// Header fields of a focal sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocalHeader {
    /// Three-letter group code
    pub group: String,

    /// Focal individual's sname
    pub focal: String,

    /// Sampling protocol in effect
    pub sample_type: SampleType,

    /// Scheduled end time of the sample (same day as the start)
    pub end_time: NaiveTime,
}

/// A point sample: one timestamped snapshot during a focal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Composite activity code: activity, posture, and for adult-female
    /// samples optional kid-contact and kid-suckle characters
    pub activity: String,

    /// Food code, present when the activity indicates feeding
    pub foodcode: Option<String>,
}

impl Point {
    /// Whether the focal individual was out of sight for this point
    pub fn is_out_of_sight(&self) -> bool {
        self.activity == constants::OUT_OF_SIGHT
    }

    /// Whether the activity indicates feeding
    pub fn is_feeding(&self) -> bool {
        self.activity.starts_with(constants::FEEDING_ACTIVITY)
    }

    /// The activity character (first of the composite code)
    pub fn activity_code(&self) -> Option<char> {
        self.activity.chars().next()
    }

    /// The posture character (second of the composite code)
    pub fn posture_code(&self) -> Option<char> {
        self.activity.chars().nth(1)
    }

    /// Kid-contact and kid-suckle characters, present only on the 4-character
    /// codes used for adult females with infant data
    pub fn kid_codes(&self) -> Option<(char, char)> {
        let chars: Vec<char> = self.activity.chars().collect();
        if chars.len() == 4 {
            Some((chars[2], chars[3]))
        } else {
            None
        }
    }
}

/// A neighbor observation attached to the most recent point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    /// The neighbor's sname, or a placeholder/unknown code
    pub neighbor: String,

    /// Proximity-rank code as recorded (protocol-dependent meaning).
    /// When the code was omitted at recording time this falls back to the
    /// line's last field, which surfaces as an import error downstream.
    pub ncode: String,
}

/// An opportunistically recorded interaction between two individuals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdLib {
    /// Three-letter group code
    pub group: String,

    /// Acting individual's sname
    pub actor: String,

    /// Behavior code
    pub act: String,

    /// Receiving individual's sname, or the NULL placeholder
    pub actee: String,

    /// Optional trailing modifier (e.g. a food code)
    pub modifier: Option<String>,
}

impl AdLib {
    /// Whether the actor and actee are the same individual
    pub fn is_self_directed(&self) -> bool {
        self.actor == self.actee
    }

    /// Whether the actee is the NULL placeholder
    pub fn has_null_actee(&self) -> bool {
        self.actee == constants::EMPTY_VALUE
    }
}

/// A free-form text note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// The note text, verbatim from the export
    pub text: String,
}

// =============================================================================
// Observation Record
// =============================================================================

/// Kind-specific payload of an observation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecordDetail {
    FocalHeader(FocalHeader),
    Point(Point),
    Neighbor(Neighbor),
    AdLib(AdLib),
    Note(Note),
}

/// One classified observation from the record stream
///
/// Records are totally ordered by (date, time), ties broken by file order;
/// `line_no` preserves the file order and gives findings a stable reference
/// back into the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    /// 1-based line number in the source file
    pub line_no: usize,

    /// Observer's three-letter initials
    pub observer: String,

    /// Observation date
    pub date: NaiveDate,

    /// Observation time
    pub time: NaiveTime,

    /// Kind-specific fields
    pub detail: RecordDetail,

    /// The raw tab-delimited line, kept for report evidence and for the
    /// echo statements in the emitted SQL
    pub raw: String,
}

impl ObservationRecord {
    /// The record's kind
    pub fn kind(&self) -> RecordKind {
        match &self.detail {
            RecordDetail::FocalHeader(_) => RecordKind::FocalHeader,
            RecordDetail::Point(_) => RecordKind::Point,
            RecordDetail::Neighbor(_) => RecordKind::Neighbor,
            RecordDetail::AdLib(_) => RecordKind::AdLib,
            RecordDetail::Note(_) => RecordKind::Note,
        }
    }

    /// Combined date and time of the observation
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Focal-header payload, if this is a header record
    pub fn as_focal_header(&self) -> Option<&FocalHeader> {
        match &self.detail {
            RecordDetail::FocalHeader(header) => Some(header),
            _ => None,
        }
    }

    /// Point payload, if this is a point record
    pub fn as_point(&self) -> Option<&Point> {
        match &self.detail {
            RecordDetail::Point(point) => Some(point),
            _ => None,
        }
    }

    /// Neighbor payload, if this is a neighbor record
    pub fn as_neighbor(&self) -> Option<&Neighbor> {
        match &self.detail {
            RecordDetail::Neighbor(neighbor) => Some(neighbor),
            _ => None,
        }
    }

    /// Ad-lib payload, if this is an interaction record
    pub fn as_adlib(&self) -> Option<&AdLib> {
        match &self.detail {
            RecordDetail::AdLib(adlib) => Some(adlib),
            _ => None,
        }
    }

    /// Note payload, if this is a text record
    pub fn as_note(&self) -> Option<&Note> {
        match &self.detail {
            RecordDetail::Note(note) => Some(note),
            _ => None,
        }
    }

    /// End of this focal sample's window, as a full timestamp.
    ///
    /// Only meaningful for header records; the window is `[start, end)` on
    /// the header's own date.
    pub fn focal_end(&self) -> Option<NaiveDateTime> {
        self.as_focal_header()
            .map(|header| self.date.and_time(header.end_time))
    }

    /// Whether `moment` falls inside this header's window `[start, end)`
    pub fn window_contains(&self, moment: NaiveDateTime) -> bool {
        match self.focal_end() {
            Some(end) => self.timestamp() <= moment && moment < end,
            None => false,
        }
    }
}
