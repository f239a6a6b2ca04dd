use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use hospital_eda_core::{Admission, Diagnosis, DiseaseCatalog, Outcome, Patient, RawTable, Treatment};

/// Options for the generation engine.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory where the raw tables are written.
    pub out_dir: PathBuf,
    /// Number of patients (and admissions) to generate.
    pub num_patients: usize,
    /// Seed for the single RNG driving every draw.
    pub seed: u64,
    /// Upper bound of the admission date window; the window spans the
    /// preceding 365 days.
    pub reference_date: NaiveDate,
    /// Department → disease lookup.
    pub catalog: DiseaseCatalog,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data/raw"),
            num_patients: 1000,
            seed: 42,
            reference_date: Local::now().date_naive(),
            catalog: DiseaseCatalog::default(),
        }
    }
}

/// The five generated tables, parents first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedDataset {
    pub patients: Vec<Patient>,
    pub admissions: Vec<Admission>,
    pub diagnoses: Vec<Diagnosis>,
    pub treatments: Vec<Treatment>,
    pub outcomes: Vec<Outcome>,
}

impl GeneratedDataset {
    pub fn row_count(&self, table: RawTable) -> usize {
        match table {
            RawTable::Patients => self.patients.len(),
            RawTable::Admissions => self.admissions.len(),
            RawTable::Diagnosis => self.diagnoses.len(),
            RawTable::Treatments => self.treatments.len(),
            RawTable::Outcomes => self.outcomes.len(),
        }
    }
}

/// Summary of a written table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub file: String,
    pub rows: u64,
    pub bytes_written: u64,
    pub sha256: String,
}

/// Report for a generation run, written as `generation_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub num_patients: u64,
    pub reference_date: NaiveDate,
    pub tables: Vec<TableReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(options: &GenerateOptions) -> Self {
        Self {
            seed: options.seed,
            num_patients: options.num_patients as u64,
            reference_date: options.reference_date,
            tables: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, report: TableReport) {
        self.bytes_written += report.bytes_written;
        self.tables.push(report);
    }
}
