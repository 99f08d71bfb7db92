//! Emission planning: records in, statement fragments out
//!
//! The emitter walks the classified stream once, in order, and turns each
//! emittable record into a [`StatementFragment`]. Fragments preserve stream
//! order because rows reference their owners through `currval` on the
//! owning table's sequence; a point row must directly follow its sample's
//! insert, and a neighbor row its point's.
//!
//! Notes are the one exception to strict stream order. A note, or a
//! behavior ad-lib stored as one, taken before its sample started cannot
//! reference that sample at its stream position, so the emitter holds it
//! and writes it immediately after the sample's own fragment.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::app::models::{AdLib, ObservationRecord, RecordDetail, SampleType};
use crate::app::services::record_classifier::ClassifiedStream;
use crate::app::services::stream_validator::counters::point_counts;
use crate::app::services::stream_validator::associate_notes;
use crate::Result;

use super::catalog::{Catalog, SnameResolution};
use super::statements;

/// How a fragment's rows are linked to their owners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkMode {
    /// Rows reference the most recently inserted owner via `currval`
    SequenceImplicit,
    /// Rows resolve their references through catalog lookup subqueries
    LookupSubquery,
    /// Rows stand alone with no reference to other inserted rows
    Standalone,
}

/// The statements emitted for one source record
#[derive(Debug, Clone, Serialize)]
pub struct StatementFragment {
    /// Source line this fragment was emitted for
    pub line_no: usize,
    /// Primary table the fragment inserts into
    pub table: &'static str,
    /// How the fragment's rows find their owners
    pub link_mode: LinkMode,
    /// The statements, echo line first, in execution order
    pub statements: Vec<String>,
}

/// A record the emitter deliberately did not emit
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub line_no: usize,
    pub reason: String,
}

/// Everything the emitter produced for one stream
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmissionPlan {
    /// Fragments in execution order
    pub fragments: Vec<StatementFragment>,
    /// Records that produced no statements, with reasons
    pub skipped: Vec<SkippedRecord>,
    /// Catalog codes the emitter passed through unresolved
    pub warnings: Vec<String>,
}

impl EmissionPlan {
    /// Total number of statements across all fragments
    pub fn statement_count(&self) -> usize {
        self.fragments
            .iter()
            .map(|fragment| fragment.statements.len())
            .sum()
    }
}

/// Plan the emission for one classified stream
pub fn plan_emission(stream: &ClassifiedStream, catalog: &Catalog) -> Result<EmissionPlan> {
    let records = &stream.records;
    let bindings = associate_notes(records);
    let mins = point_counts(records);
    let notes_by_line: HashMap<usize, &ObservationRecord> = records
        .iter()
        .filter(|record| record.as_note().is_some())
        .map(|record| (record.line_no, record))
        .collect();

    let mut plan = EmissionPlan::default();

    // The tablet description goes into the emitted lookup subquery as-is;
    // the catalog only tells us whether the database will recognize it.
    if catalog.collection_system(&stream.source.tablet).is_none() {
        warn!(tablet = %stream.source.tablet, "tablet not in collection-system catalog");
        plan.warnings.push(format!(
            "collection system '{}' not in catalog, emitted verbatim",
            stream.source.tablet
        ));
    }

    // Reportable behaviors recorded outside any focal window still become
    // notes. Like text notes taken between samples, they wait for the next
    // same-day sample and are written right after its insert.
    let mut headers_by_day: HashMap<NaiveDate, Vec<&ObservationRecord>> = HashMap::new();
    for record in records {
        if record.as_focal_header().is_some() {
            headers_by_day.entry(record.date).or_default().push(record);
        }
    }
    for headers in headers_by_day.values_mut() {
        headers.sort_by_key(|header| (header.timestamp(), header.line_no));
    }

    let mut deferred_adlibs: HashMap<usize, Vec<&ObservationRecord>> = HashMap::new();
    let mut stray_adlibs: HashSet<usize> = HashSet::new();
    {
        let mut walking_header: Option<&ObservationRecord> = None;
        for record in records {
            match &record.detail {
                RecordDetail::FocalHeader(_) => walking_header = Some(record),
                RecordDetail::AdLib(adlib) if catalog.act_saved_as_note(&adlib.act) => {
                    let in_focal = walking_header
                        .map(|header| header.window_contains(record.timestamp()))
                        .unwrap_or(false);
                    if in_focal {
                        continue;
                    }
                    let owner = headers_by_day.get(&record.date).and_then(|headers| {
                        headers
                            .iter()
                            .find(|header| header.timestamp() >= record.timestamp())
                    });
                    match owner {
                        Some(header) => deferred_adlibs
                            .entry(header.line_no)
                            .or_default()
                            .push(record),
                        None => {
                            stray_adlibs.insert(record.line_no);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let mut current_header: Option<&ObservationRecord> = None;
    let mut current_sample_type: Option<SampleType> = None;
    let mut minute = 0usize;
    let mut last_point_out_of_sight = false;

    for record in records {
        match &record.detail {
            RecordDetail::FocalHeader(header) => {
                current_header = Some(record);
                current_sample_type = Some(header.sample_type.clone());
                minute = 0;
                last_point_out_of_sight = false;

                let stype = match header.sample_type.stype() {
                    Some(stype) => stype.to_string(),
                    None => {
                        plan.warnings.push(format!(
                            "sample type '{}' on line {} not in catalog, emitted verbatim",
                            header.sample_type.code(),
                            record.line_no
                        ));
                        header.sample_type.code().to_string()
                    }
                };
                let sample_mins = mins.get(&record.line_no).copied().unwrap_or(0);

                plan.fragments.push(StatementFragment {
                    line_no: record.line_no,
                    table: "samples",
                    link_mode: LinkMode::LookupSubquery,
                    statements: vec![
                        statements::select_line(&record.raw),
                        statements::insert_sample(
                            record.date,
                            record.time,
                            &record.observer,
                            &stype,
                            &header.group,
                            &header.focal,
                            sample_mins,
                            &stream.source.program_id,
                            &stream.source.setup_id,
                            &stream.source.tablet,
                        ),
                    ],
                });

                // Notes taken before this sample started are owned by it and
                // must follow its insert directly. Behavior ad-libs bound the
                // same way interleave with them in time order.
                let mut deferred: Vec<&ObservationRecord> = Vec::new();
                if let Some(note_lines) = bindings.deferred_by_header.get(&record.line_no) {
                    deferred.extend(
                        note_lines
                            .iter()
                            .filter_map(|line| notes_by_line.get(line).copied()),
                    );
                }
                if let Some(adlibs) = deferred_adlibs.get(&record.line_no) {
                    deferred.extend(adlibs.iter().copied());
                }
                deferred.sort_by_key(|owned| (owned.timestamp(), owned.line_no));
                for owned in deferred {
                    match &owned.detail {
                        RecordDetail::AdLib(adlib) => {
                            plan.fragments.push(behavior_note_fragment(owned, adlib, catalog))
                        }
                        _ => plan.fragments.push(note_fragment(owned, catalog)),
                    }
                }
            }

            RecordDetail::Point(point) => {
                if current_header.is_none() {
                    plan.skipped.push(SkippedRecord {
                        line_no: record.line_no,
                        reason: "point outside any focal sample".to_string(),
                    });
                    continue;
                }
                minute += 1;
                last_point_out_of_sight = point.is_out_of_sight();

                let activity = point.activity_code().unwrap_or('?').to_string();
                let posture = point.posture_code().unwrap_or('?').to_string();

                let mut fragment_statements = vec![
                    statements::select_line(&record.raw),
                    statements::insert_point(
                        minute,
                        record.time,
                        &activity,
                        &posture,
                        point.foodcode.as_deref(),
                    ),
                ];
                if let Some((kidcontact, kidsuckle)) = point.kid_codes() {
                    fragment_statements.push(statements::insert_fpoint(kidcontact, kidsuckle));
                }

                plan.fragments.push(StatementFragment {
                    line_no: record.line_no,
                    table: "point_data",
                    link_mode: LinkMode::SequenceImplicit,
                    statements: fragment_statements,
                });
            }

            RecordDetail::Neighbor(neighbor) => {
                if current_header.is_none() {
                    plan.skipped.push(SkippedRecord {
                        line_no: record.line_no,
                        reason: "neighbor outside any focal sample".to_string(),
                    });
                    continue;
                }
                if last_point_out_of_sight {
                    plan.skipped.push(SkippedRecord {
                        line_no: record.line_no,
                        reason: "neighbor follows an out-of-sight point".to_string(),
                    });
                    continue;
                }

                let resolution = catalog.resolve_sname(&neighbor.neighbor);
                if resolution == SnameResolution::Absent {
                    plan.skipped.push(SkippedRecord {
                        line_no: record.line_no,
                        reason: "placeholder means no neighbor was present".to_string(),
                    });
                    continue;
                }

                let sample_type = current_sample_type
                    .clone()
                    .unwrap_or_else(|| SampleType::Other(String::new()));
                let ncode = match catalog.resolve_ncode(&neighbor.ncode, &sample_type) {
                    Some(ncode) => ncode.to_string(),
                    None => {
                        plan.warnings.push(format!(
                            "neighbor code '{}' on line {} not in catalog, emitted verbatim",
                            neighbor.ncode, record.line_no
                        ));
                        neighbor.ncode.clone()
                    }
                };

                let insert = match resolution {
                    SnameResolution::Known(sname) => statements::insert_neighbor(&sname, &ncode),
                    SnameResolution::Unknown(unksname) => {
                        statements::insert_unknown_neighbor(&unksname, &ncode)
                    }
                    SnameResolution::Absent => unreachable!(),
                };

                plan.fragments.push(StatementFragment {
                    line_no: record.line_no,
                    table: "neighbors",
                    link_mode: LinkMode::SequenceImplicit,
                    statements: vec![statements::select_line(&record.raw), insert],
                });
            }

            RecordDetail::AdLib(adlib) => {
                let in_focal = current_header
                    .map(|header| header.window_contains(record.timestamp()))
                    .unwrap_or(false);

                if catalog.act_saved_as_note(&adlib.act) {
                    // Mount, ejaculation, and consort observations are stored
                    // as text notes rather than interaction rows.
                    if in_focal {
                        plan.fragments.push(behavior_note_fragment(record, adlib, catalog));
                    } else if stray_adlibs.contains(&record.line_no) {
                        plan.skipped.push(SkippedRecord {
                            line_no: record.line_no,
                            reason: "behavior note with no same-day focal sample to own it"
                                .to_string(),
                        });
                    }
                    // Otherwise deferred; emitted right after its owning
                    // sample above.
                    continue;
                }

                let fragment = if in_focal {
                    StatementFragment {
                        line_no: record.line_no,
                        table: "actor_actees",
                        link_mode: LinkMode::SequenceImplicit,
                        statements: vec![
                            statements::select_line(&record.raw),
                            statements::insert_interaction_in_focal(
                                &record.observer,
                                record.date,
                                record.time,
                                &adlib.actor,
                                &adlib.act,
                                &adlib.actee,
                            ),
                        ],
                    }
                } else {
                    StatementFragment {
                        line_no: record.line_no,
                        table: "actor_actees",
                        link_mode: LinkMode::Standalone,
                        statements: vec![
                            statements::select_line(&record.raw),
                            statements::insert_interaction_standalone(
                                &record.observer,
                                record.date,
                                &adlib.actor,
                                &adlib.act,
                                &adlib.actee,
                            ),
                        ],
                    }
                };
                plan.fragments.push(fragment);
            }

            RecordDetail::Note(_) => {
                if bindings.unbound.contains(&record.line_no) {
                    plan.skipped.push(SkippedRecord {
                        line_no: record.line_no,
                        reason: "note not owned by any focal sample".to_string(),
                    });
                    continue;
                }
                if !bindings.is_contained(record.line_no) {
                    // Deferred; emitted right after its owning sample above.
                    continue;
                }
                plan.fragments.push(note_fragment(record, catalog));
            }
        }
    }

    debug!(
        fragments = plan.fragments.len(),
        statements = plan.statement_count(),
        skipped = plan.skipped.len(),
        warnings = plan.warnings.len(),
        "emission planned"
    );

    Ok(plan)
}

fn behavior_note_fragment(
    record: &ObservationRecord,
    adlib: &AdLib,
    catalog: &Catalog,
) -> StatementFragment {
    let mut text = format!("{} {} {}", adlib.actor, adlib.act, adlib.actee);
    if let Some(modifier) = &adlib.modifier {
        text.push(' ');
        text.push_str(modifier);
    }
    let prefix = catalog.note_prefix(&text);

    StatementFragment {
        line_no: record.line_no,
        table: "allmiscs",
        link_mode: LinkMode::SequenceImplicit,
        statements: vec![
            statements::select_line(&record.raw),
            statements::insert_allmisc(record.time, prefix, &text),
        ],
    }
}

fn note_fragment(record: &ObservationRecord, catalog: &Catalog) -> StatementFragment {
    let text = record
        .as_note()
        .map(|note| note.text.as_str())
        .unwrap_or_default();
    let prefix = catalog.note_prefix(text);

    StatementFragment {
        line_no: record.line_no,
        table: "allmiscs",
        link_mode: LinkMode::SequenceImplicit,
        statements: vec![
            statements::select_line(&record.raw),
            statements::insert_allmisc(record.time, prefix, text),
        ],
    }
}
