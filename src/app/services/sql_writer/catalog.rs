//! Database catalog knowledge used during emission
//!
//! The emitter needs to translate export vocabulary (neighbor codes, sample
//! types, tablet descriptions, unknown-individual placeholders) into the
//! values the database expects. All of that knowledge lives in a [`Catalog`]
//! built once per run; the defaults come from [`crate::constants`] but the
//! maps are injected at construction so tests can substitute their own.

use std::collections::HashMap;

use regex::Regex;

use crate::app::models::SampleType;
use crate::constants::{
    neighbor_codes, COLLECTION_SYSTEMS, NOTE_BEHAVIOR_KEYWORDS, SAVE_AS_NOTES, UNKNOWN_SNAMES,
};
use crate::{Error, Result};

/// How a neighbor sname resolves against the catalogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnameResolution {
    /// A real sname, inserted in the sname column
    Known(String),
    /// An unknown-individual placeholder, inserted in the unksname column
    Unknown(String),
    /// A "no neighbor" placeholder; the row is not inserted at all
    Absent,
}

/// Immutable catalog data for one emission run
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Tablet description -> collection-system abbreviation
    collection_systems: HashMap<String, String>,
    /// Placeholder sname -> database unksname value (None means no neighbor)
    unknown_snames: HashMap<String, Option<String>>,
    /// Export neighbor code -> database ncode, adult-female protocol
    female_ncodes: HashMap<String, String>,
    /// Export neighbor code -> database ncode, juvenile protocol
    juvenile_ncodes: HashMap<String, String>,
    /// Behavior code -> word-boundary matcher over uppercased note text
    note_matchers: Vec<(String, Regex)>,
}

impl Catalog {
    /// Build the catalog from the compiled-in defaults
    pub fn from_defaults() -> Result<Self> {
        let mut note_matchers = Vec::new();
        for (behavior, keywords) in NOTE_BEHAVIOR_KEYWORDS {
            let alternatives = keywords.join("|");
            let pattern = format!(r"\b(?:{})\b", alternatives);
            let matcher = Regex::new(&pattern).map_err(|error| {
                Error::configuration(format!(
                    "bad keyword pattern for behavior '{}': {}",
                    behavior, error
                ))
            })?;
            note_matchers.push((behavior.to_string(), matcher));
        }

        Ok(Self {
            collection_systems: COLLECTION_SYSTEMS
                .iter()
                .map(|(abbrev, descr)| (descr.to_string(), abbrev.to_string()))
                .collect(),
            unknown_snames: UNKNOWN_SNAMES
                .iter()
                .map(|(code, value)| {
                    let resolved = if *value == crate::constants::EMPTY_VALUE {
                        None
                    } else {
                        Some(value.to_string())
                    };
                    (code.to_string(), resolved)
                })
                .collect(),
            female_ncodes: pairs_to_map(neighbor_codes::ADULT_FEMALE),
            juvenile_ncodes: pairs_to_map(neighbor_codes::JUVENILE),
            note_matchers,
        })
    }

    /// Resolve a tablet description to its collection-system abbreviation
    pub fn collection_system(&self, tablet: &str) -> Option<&str> {
        self.collection_systems.get(tablet).map(String::as_str)
    }

    /// Resolve a neighbor sname against the unknown-individual catalog
    pub fn resolve_sname(&self, sname: &str) -> SnameResolution {
        match self.unknown_snames.get(sname) {
            Some(Some(value)) => SnameResolution::Unknown(value.clone()),
            Some(None) => SnameResolution::Absent,
            None => SnameResolution::Known(sname.to_string()),
        }
    }

    /// Resolve an export neighbor code under the given sampling protocol
    pub fn resolve_ncode(&self, ncode: &str, sample_type: &SampleType) -> Option<&str> {
        let table = match sample_type {
            SampleType::AdultFemale => &self.female_ncodes,
            SampleType::Juvenile => &self.juvenile_ncodes,
            SampleType::Other(_) => return None,
        };
        table.get(ncode).map(String::as_str)
    }

    /// Whether an ad-lib act is stored as a text note instead of an
    /// interaction row
    pub fn act_saved_as_note(&self, act: &str) -> bool {
        SAVE_AS_NOTES.contains(&act)
    }

    /// Behavior codes recognized in a note's text.
    ///
    /// Matching is word-bounded over the uppercased text, so "CONSORT"
    /// matches but "CONSORTIUM" does not.
    pub fn behaviors_in_text(&self, text: &str) -> Vec<&str> {
        let upper = text.to_uppercase();
        self.note_matchers
            .iter()
            .filter(|(_, matcher)| matcher.is_match(&upper))
            .map(|(behavior, _)| behavior.as_str())
            .collect()
    }

    /// The one-character prefix required on this note's database text
    pub fn note_prefix(&self, text: &str) -> &'static str {
        use crate::constants::{behaviors, note_prefixes};
        if self
            .behaviors_in_text(text)
            .contains(&behaviors::CONSORT)
        {
            note_prefixes::CONSORT
        } else {
            note_prefixes::OTHER
        }
    }
}

fn pairs_to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(code, value)| (code.to_string(), value.to_string()))
        .collect()
}
