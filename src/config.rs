//! Run configuration
//!
//! A [`Config`] describes one invocation of the processor: which export to
//! read, where results go, and how the emitted transaction should end. It is
//! assembled from CLI arguments by the command layer and validated once
//! before any file is touched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::{Error, Result};

/// How reports are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Colored terminal output
    Human,
    /// JSON for scripting
    Json,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::Human
    }
}

/// Configuration for one processor run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The export file to process
    pub input: PathBuf,

    /// Where to write the validation report; stdout when unset
    pub report_output: Option<PathBuf>,

    /// Where to write the SQL script; stdout when unset
    pub sql_output: Option<PathBuf>,

    /// Report rendering format
    pub format: ReportFormat,

    /// End the emitted transaction with COMMIT instead of ROLLBACK
    pub commit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            report_output: None,
            sql_output: None,
            format: ReportFormat::default(),
            commit: false,
        }
    }
}

impl Config {
    /// Check the configuration against the filesystem
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "input file does not exist: {}",
                self.input.display()
            )));
        }
        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "input path is not a file: {}",
                self.input.display()
            )));
        }

        for output in [&self.report_output, &self.sql_output].into_iter().flatten() {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        debug!(input = %self.input.display(), commit = self.commit, "configuration validated");
        Ok(())
    }
}
