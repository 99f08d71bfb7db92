//! Command-line argument definitions for the Prim8 processor
//!
//! The CLI is defined with the clap derive API. Each subcommand owns its
//! arguments and knows how to validate them before any work starts.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the Prim8 export processor
///
/// Validates field-observation exports from the Prim8 collection app and
/// generates the SQL transaction that loads them into the database.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prim8-processor",
    version,
    about = "Validate Prim8 field-observation exports and generate database import SQL",
    long_about = "Processes tab-delimited exports from the Prim8 data-collection app: classifies \
                  each record, checks the stream against the focal-sampling protocol, reports \
                  anything a person should review, and emits the ordered SQL transaction that \
                  loads the data into the database."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Validate an export and print the findings report
    Check(CheckArgs),
    /// Validate an export and emit its SQL import transaction
    Write(WriteArgs),
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// The export file to validate
    #[arg(value_name = "FILE", help = "Path to the processed Prim8 export file")]
    pub input: PathBuf,

    /// Output file for the report
    ///
    /// If not specified, the report is written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// Report format
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report output format"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the write command
#[derive(Debug, Clone, Parser)]
pub struct WriteArgs {
    /// The export file to process
    #[arg(value_name = "FILE", help = "Path to the processed Prim8 export file")]
    pub input: PathBuf,

    /// Output file for the SQL script
    ///
    /// If not specified, the script is written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the SQL script to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// End the transaction with COMMIT
    ///
    /// By default the script ends with ROLLBACK so it can be rehearsed
    /// against the live database without changing anything.
    #[arg(long = "commit", help = "End the transaction with COMMIT instead of ROLLBACK")]
    pub commit: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

fn validate_input(input: &PathBuf) -> Result<()> {
    if !input.exists() {
        return Err(Error::configuration(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }
    if !input.is_file() {
        return Err(Error::configuration(format!(
            "Input path is not a file: {}",
            input.display()
        )));
    }
    Ok(())
}

fn validate_output(output: &Option<PathBuf>) -> Result<()> {
    if let Some(output_file) = output {
        if let Some(parent) = output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::configuration(format!(
                    "Output file directory does not exist: {}",
                    parent.display()
                )));
            }
        }
    }
    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl CheckArgs {
    /// Validate the check command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input(&self.input)?;
        validate_output(&self.output_file)?;
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl WriteArgs {
    /// Validate the write command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input(&self.input)?;
        validate_output(&self.output_file)?;
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}
