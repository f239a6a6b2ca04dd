use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the cleaning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Directory holding the generator's five CSV files.
    pub raw_dir: PathBuf,
    /// Directory receiving the consolidated table and the cleaning report.
    pub processed_dir: PathBuf,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
        }
    }
}

/// Audit trail of a cleaning run, written as `cleaning_report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows read per raw table.
    pub input_rows: BTreeMap<String, u64>,
    /// Rows of the joined table before the cleaning rules ran.
    pub rows_before: u64,
    pub rows_after: u64,
    pub duplicates_removed: u64,
    pub severity_filled: u64,
    pub outcome_filled: u64,
    pub negative_stay_removed: u64,
    /// Rows dropped because an admission or discharge date was empty.
    pub missing_stay_removed: u64,
    pub output_file: String,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> u64 {
        self.rows_before - self.rows_after
    }
}

/// Result of a cleaning run.
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub output_path: PathBuf,
    pub report_path: PathBuf,
    pub report: CleaningReport,
}
