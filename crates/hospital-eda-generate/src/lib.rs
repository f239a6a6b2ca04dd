//! Synthetic hospital dataset generator.
//!
//! Produces the five raw tables (patients, admissions, diagnosis, treatments,
//! outcomes) from a single seeded RNG, checks referential integrity, and
//! writes them as CSV together with a `generation_report.json`.

pub mod engine;
pub mod errors;
pub mod integrity;
pub mod model;
pub mod output;
pub mod sampling;

pub use engine::{GenerationEngine, GenerationResult, generate_dataset};
pub use errors::GenerationError;
pub use integrity::{IntegrityReport, OrphanKey, verify_integrity};
pub use model::{GenerateOptions, GeneratedDataset, GenerationReport, TableReport};
