//! Core contracts shared by the hospital EDA pipeline stages.
//!
//! This crate defines the entity rows written by the generator, the
//! categorical vocabularies they draw from, and the consolidated record that
//! the cleaner produces and the analyzer consumes.

pub mod atomic;
pub mod catalog;
pub mod consolidated;
pub mod entities;
pub mod error;

pub use atomic::{write_atomic, write_json_atomic};
pub use catalog::{
    AdmissionType, BloodGroup, City, Department, DiseaseCatalog, FollowUp, Gender, OutcomeKind,
    Severity, TreatmentType,
};
pub use consolidated::{CONSOLIDATED_COLUMNS, CLEANED_FILE_NAME, ConsolidatedRecord, UNKNOWN};
pub use entities::{Admission, Diagnosis, Outcome, Patient, RawTable, Treatment, format_id};
pub use error::{Error, Result};

/// Date format used by every flat file in the pipeline.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
