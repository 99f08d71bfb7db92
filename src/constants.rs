//! Application constants for the Prim8 processor
//!
//! This module contains the record discriminators, protocol vocabularies,
//! and default catalog data used throughout the processor. The catalog data
//! here are defaults only; they are injected into [`Catalog`] at construction
//! time rather than read as ambient globals.
//!
//! [`Catalog`]: crate::app::services::sql_writer::catalog::Catalog

// =============================================================================
// Record Discriminators
// =============================================================================

/// Line discriminator codes in the processed export file
pub mod discriminators {
    /// Begins a new focal sample
    pub const FOCAL: &str = "HDR";

    /// A point sample within a focal
    pub const POINT: &str = "PNT";

    /// A focal neighbor observation
    pub const NEIGHBOR: &str = "NGH";

    /// An ad-lib / all-occurrences interaction
    pub const ADLIB: &str = "ADL";

    /// A free-form text note
    pub const NOTE: &str = "TXT";
}

/// Placeholder used in the export for empty values
pub const EMPTY_VALUE: &str = "NULL";

/// Point activity value meaning the focal individual was out of sight
pub const OUT_OF_SIGHT: &str = "OOS";

/// Point activity character that indicates feeding (a food code may follow)
pub const FEEDING_ACTIVITY: char = 'F';

/// Maximum number of points allowed in one focal sample
pub const MAX_POINTS_PER_FOCAL: usize = 10;

/// Expected number of neighbors per in-sight point
pub const NEIGHBORS_PER_POINT: usize = 3;

/// Length of a well-formed observer code (three-letter initials)
pub const OBSERVER_CODE_LEN: usize = 3;

// =============================================================================
// Sample Types
// =============================================================================

/// Focal sample "type" codes used in the export, and their database values
pub mod sample_types {
    /// Adult-female protocol code in the export
    pub const ADULT_FEMALE: &str = "FEM";

    /// Juvenile protocol code in the export
    pub const JUVENILE: &str = "JUV";

    /// Database stype for adult females
    pub const ADULT_FEMALE_STYPE: &str = "F";

    /// Database stype for juveniles ("Generic" as of Sep 2024)
    pub const JUVENILE_STYPE: &str = "G";
}

// =============================================================================
// Neighbor Codes
// =============================================================================

/// Neighbor codes used in the export, and their database counterparts.
///
/// The ordering of neighbors carries different meaning between sampling
/// protocols, so each protocol has its own translation table.
pub mod neighbor_codes {
    /// Neighbor codes as written by the collection app
    pub const EXPORT_CODES: &[&str] = &["N0", "N1", "N2"];

    /// Adult-female protocol: nearest, other adult, other
    pub const ADULT_FEMALE: &[(&str, &str)] = &[("N0", "1"), ("N1", "A"), ("N2", "O")];

    /// Juvenile protocol: first, second, third nearest
    pub const JUVENILE: &[(&str, &str)] = &[("N0", "1"), ("N1", "2"), ("N2", "3")];
}

/// "Unknown" snames used in the export, and their database counterparts.
///
/// Codes that map to `NULL` mean "no neighbor" and are never inserted.
pub const UNKNOWN_SNAMES: &[(&str, &str)] = &[
    ("996", "996"),
    ("997", "997"),
    ("998", "998"),
    ("NULL", "NULL"),
    ("XXX", "NULL"),
];

/// Codes used when an sname was not known at recording time.
/// Any incidence of these needs correction before upload.
pub const UNNAMED_CODES: &[&str] = &["IMM", "INF"];

// =============================================================================
// Behaviors
// =============================================================================

/// Database behavior codes that matter to the emitter
pub mod behaviors {
    pub const MOUNT: &str = "M";
    pub const EJACULATION: &str = "E";
    pub const CONSORT: &str = "C";
}

/// Ad-lib acts that are saved only as text notes, never as interactions
pub const SAVE_AS_NOTES: &[&str] = &[behaviors::MOUNT, behaviors::EJACULATION, behaviors::CONSORT];

/// Keyword table for recognizing reportable behaviors in free text.
///
/// Notes sometimes spell a behavior out ("AAA consort BBB" rather than
/// "AAA C BBB"), so each behavior code carries its long-form spellings too.
pub const NOTE_BEHAVIOR_KEYWORDS: &[(&str, &[&str])] = &[
    (behaviors::MOUNT, &["M", "MOUNT"]),
    (behaviors::EJACULATION, &["E", "EJACULATE"]),
    (behaviors::CONSORT, &["C", "CONSORT", "CONSORTING"]),
];

/// One-character prefixes required on ALLMISCS text
pub mod note_prefixes {
    /// Prefix for consort notes
    pub const CONSORT: &str = "C";

    /// Prefix for miscellaneous/"other" notes
    pub const OTHER: &str = "O";
}

// =============================================================================
// Collection Systems
// =============================================================================

/// Tablet abbreviations and their catalog descriptions
/// (SAMPLES_COLLECTION_SYSTEMS.Descr)
pub const COLLECTION_SYSTEMS: &[(&str, &str)] = &[
    ("SA", "Samsung Tablet A"),
    ("SB", "Samsung Tablet B"),
    ("SC", "Samsung Tablet C"),
    ("SD", "Samsung Tablet D"),
    ("SE", "Samsung Tablet E"),
    ("SF", "Samsung Tablet F"),
    ("SG", "Samsung Tablet G"),
    ("SH", "Samsung Tablet H"),
    ("SI", "Samsung Tablet I"),
];

// =============================================================================
// Input Format
// =============================================================================

/// Prefix of the metadata line that opens every processed export file
pub const METADATA_LINE_PREFIX: &str = "Parsed data from:";

/// Date format used throughout the export
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used throughout the export
pub const TIME_FORMAT: &str = "%H:%M:%S";
