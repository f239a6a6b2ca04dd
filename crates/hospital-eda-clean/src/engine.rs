use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::info;

use hospital_eda_core::{
    CLEANED_FILE_NAME, CONSOLIDATED_COLUMNS, ConsolidatedRecord, RawTable, write_atomic,
    write_json_atomic,
};

use crate::errors::CleanError;
use crate::join::consolidate;
use crate::load::load_raw_tables;
use crate::model::{CleanOptions, CleanResult, CleaningReport};
use crate::rules::apply_cleaning_rules;

pub const REPORT_FILE_NAME: &str = "cleaning_report.json";

/// Entry point for the cleaning stage.
#[derive(Debug, Clone)]
pub struct CleaningEngine {
    options: CleanOptions,
}

impl CleaningEngine {
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<CleanResult, CleanError> {
        info!(
            event = "cleaning_started",
            raw_dir = %self.options.raw_dir.display(),
            "data cleaning started"
        );

        let tables = load_raw_tables(&self.options.raw_dir)?;
        let input_rows: BTreeMap<String, u64> = RawTable::ALL
            .iter()
            .map(|table| (table.name().to_string(), tables.row_count(*table) as u64))
            .collect();
        info!(event = "datasets_loaded", "all raw datasets loaded");

        let joined = consolidate(&tables);
        info!(
            event = "feature_computed",
            feature = "length_of_stay",
            "derived length_of_stay from admission and discharge dates"
        );
        info!(event = "datasets_merged", rows = joined.len(), "all datasets merged");

        let rows_before = joined.len() as u64;
        let (cleaned, stats) = apply_cleaning_rules(joined);
        let rows_after = cleaned.len() as u64;

        info!(event = "rows_before_cleaning", rows = rows_before, "rows before cleaning: {rows_before}");
        info!(event = "rows_after_cleaning", rows = rows_after, "rows after cleaning: {rows_after}");
        info!(
            event = "cleaning_rules_applied",
            duplicates_removed = stats.duplicates_removed,
            severity_filled = stats.severity_filled,
            outcome_filled = stats.outcome_filled,
            negative_stay_removed = stats.negative_stay_removed,
            missing_stay_removed = stats.missing_stay_removed,
            "cleaning rules applied"
        );

        std::fs::create_dir_all(&self.options.processed_dir)?;
        let output_path = self.options.processed_dir.join(CLEANED_FILE_NAME);
        write_consolidated_csv(&output_path, &cleaned)?;
        info!(
            event = "artifact_written",
            path = %output_path.display(),
            rows = rows_after,
            columns = CONSOLIDATED_COLUMNS.len(),
            "cleaned dataset saved"
        );

        let report = CleaningReport {
            input_rows,
            rows_before,
            rows_after,
            duplicates_removed: stats.duplicates_removed,
            severity_filled: stats.severity_filled,
            outcome_filled: stats.outcome_filled,
            negative_stay_removed: stats.negative_stay_removed,
            missing_stay_removed: stats.missing_stay_removed,
            output_file: CLEANED_FILE_NAME.to_string(),
        };
        let report_path = self.options.processed_dir.join(REPORT_FILE_NAME);
        write_json_atomic(&report_path, &report)?;

        info!(
            event = "cleaning_completed",
            rows_removed = report.rows_removed(),
            "data cleaning completed"
        );

        Ok(CleanResult {
            output_path,
            report_path,
            report,
        })
    }
}

/// Write the consolidated table with its fixed header, replacing any prior
/// version.
pub fn write_consolidated_csv(path: &Path, rows: &[ConsolidatedRecord]) -> Result<(), CleanError> {
    write_atomic(path, |file: &mut File| {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer.write_record(CONSOLIDATED_COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    })
}
