//! Cleaning stage: joins the five raw tables into one consolidated table,
//! derives `length_of_stay`, and applies the data-quality rules.

pub mod engine;
pub mod errors;
pub mod join;
pub mod load;
pub mod model;
pub mod rules;

pub use engine::CleaningEngine;
pub use errors::CleanError;
pub use model::{CleanOptions, CleanResult, CleaningReport};
pub use rules::{RuleStats, apply_cleaning_rules};
