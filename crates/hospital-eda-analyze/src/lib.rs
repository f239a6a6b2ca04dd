//! Analysis stage: descriptive statistics, summary tables and charts over the
//! consolidated hospital table.

pub mod charts;
pub mod engine;
pub mod errors;
pub mod model;
pub mod report;
pub mod stats;
pub mod tables;

pub use engine::AnalysisEngine;
pub use errors::AnalyzeError;
pub use model::{AnalysisReport, AnalyzeOptions, ArtifactReport, ArtifactStatus, ChartSize};
