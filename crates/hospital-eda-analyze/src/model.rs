use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Pixel dimensions shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Options for the analysis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// The consolidated table written by the cleaner.
    pub input_path: PathBuf,
    pub figures_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub chart_size: ChartSize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/processed/hospital_patient_cleaned.csv"),
            figures_dir: PathBuf::from("outputs/figures"),
            reports_dir: PathBuf::from("outputs/reports"),
            chart_size: ChartSize::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Written,
    Failed,
}

/// Outcome of one analysis unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub name: String,
    pub status: ArtifactStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report for an analysis run, written as `analysis_report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub rows_loaded: u64,
    pub artifacts: Vec<ArtifactReport>,
}

impl AnalysisReport {
    pub fn failed(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|artifact| artifact.status == ArtifactStatus::Failed)
            .count()
    }
}
