//! Command implementations for the Prim8 processor CLI
//!
//! Both commands share the same front half (read, classify, validate); they
//! differ in what they do with the result. `check` renders the findings
//! report, `write` emits the SQL transaction regardless of findings and
//! surfaces them as warnings.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::app::services::record_classifier::{read_export, ClassifiedStream};
use crate::app::services::sql_writer::{assemble, plan_emission, Catalog, TransactionEnd};
use crate::app::services::stream_validator::{validate_stream, ValidationReport};
use crate::cli::args::{Args, CheckArgs, Commands, OutputFormat, WriteArgs};
use crate::config::{Config, ReportFormat};
use crate::{Error, Result};

/// Main command dispatcher
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Check(check_args)) => run_check(check_args),
        Some(Commands::Write(write_args)) => run_write(write_args),
        None => Err(Error::configuration("no command specified")),
    }
}

/// Validate an export and print or save the findings report
fn run_check(args: CheckArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let config = Config {
        input: args.input.clone(),
        report_output: args.output_file.clone(),
        format: match args.output_format {
            OutputFormat::Human => ReportFormat::Human,
            OutputFormat::Json => ReportFormat::Json,
        },
        ..Config::default()
    };
    config.validate()?;

    let (_, report) = read_and_validate(&config.input)?;

    let rendered = match config.format {
        ReportFormat::Human => report.render(),
        ReportFormat::Json => report.to_json()?,
    };

    match &config.report_output {
        Some(path) => {
            fs::write(path, &rendered)
                .map_err(|source| Error::io(format!("failed to write {}", path.display()), source))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }

    info!(
        findings = report.findings.len(),
        errors = report.has_errors(),
        "check complete"
    );
    Ok(())
}

/// Validate an export and emit its SQL import transaction
fn run_write(args: WriteArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let config = Config {
        input: args.input.clone(),
        sql_output: args.output_file.clone(),
        commit: args.commit,
        ..Config::default()
    };
    config.validate()?;

    let (stream, report) = read_and_validate(&config.input)?;

    // Findings never block emission; the script is best-effort and the
    // report tells the observer what to fix.
    if !report.is_clean() {
        warn!(
            findings = report.findings.len(),
            errors = report.has_errors(),
            "emitting SQL for an export with findings; run check to review them"
        );
    }

    let catalog = Catalog::from_defaults()?;
    let plan = plan_emission(&stream, &catalog)?;
    for warning in &plan.warnings {
        warn!(%warning, "unresolved catalog code in emitted SQL");
    }

    let end = if config.commit {
        TransactionEnd::Commit
    } else {
        TransactionEnd::Rollback
    };
    let script = assemble(&plan, end);

    match &config.sql_output {
        Some(path) => {
            fs::write(path, &script)
                .map_err(|source| Error::io(format!("failed to write {}", path.display()), source))?;
            info!(path = %path.display(), "SQL script written");
        }
        None => print!("{}", script),
    }

    info!(
        fragments = plan.fragments.len(),
        statements = plan.statement_count(),
        skipped = plan.skipped.len(),
        commit = config.commit,
        "write complete"
    );
    Ok(())
}

/// Shared front half of both commands
fn read_and_validate(input: &Path) -> Result<(ClassifiedStream, ValidationReport)> {
    info!(input = %input.display(), "reading export");
    let stream = read_export(input)?;
    debug!(
        records = stream.records.len(),
        failures = stream.failures.len(),
        "export classified"
    );

    let report = validate_stream(&stream)?;
    Ok((stream, report))
}

/// Set up logging based on verbosity settings
fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prim8_processor={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
