//! SQL emission for classified observation streams
//!
//! This module family turns a classified stream into the SQL script that
//! loads it into the database:
//! - [`catalog`] - export-vocabulary to database-value translation
//! - [`statements`] - one function per statement shape, escaping included
//! - [`emitter`] - the ordered walk that plans which statements to write
//! - [`transaction`] - wrapping the plan in BEGIN/COMMIT or BEGIN/ROLLBACK
//!
//! Emission is deliberately tolerant: codes the catalogs cannot resolve are
//! passed through verbatim and surfaced as warnings, so the script fails in
//! the database session where a person can see the echoed source line, not
//! silently here.

pub mod catalog;
pub mod emitter;
pub mod statements;
pub mod transaction;

#[cfg(test)]
pub mod tests;

pub use catalog::{Catalog, SnameResolution};
pub use emitter::{plan_emission, EmissionPlan, LinkMode, SkippedRecord, StatementFragment};
pub use transaction::{assemble, TransactionEnd};

use crate::app::services::record_classifier::ClassifiedStream;
use crate::Result;

/// Plan and assemble the full SQL script for one stream
pub fn write_sql(stream: &ClassifiedStream, end: TransactionEnd) -> Result<String> {
    let catalog = Catalog::from_defaults()?;
    let plan = plan_emission(stream, &catalog)?;
    Ok(assemble(&plan, end))
}
