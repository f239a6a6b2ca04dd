use std::path::{Path, PathBuf};

use tracing::{error, info};

use hospital_eda_core::{CONSOLIDATED_COLUMNS, ConsolidatedRecord, write_json_atomic};

use crate::charts::{
    AGE_DISTRIBUTION_FILE_NAME, CORRELATION_HEATMAP_FILE_NAME, COST_BY_OUTCOME_FILE_NAME,
    CROSSTAB_CHART_FILE_NAME, GENDER_DISTRIBUTION_FILE_NAME, STAY_BY_DEPARTMENT_FILE_NAME,
    TOP_DISEASES_FILE_NAME, bar_chart, boxplot_chart, correlation_heatmap, histogram_chart,
    stacked_bar_chart,
};
use crate::errors::AnalyzeError;
use crate::model::{AnalysisReport, AnalyzeOptions, ArtifactReport, ArtifactStatus};
use crate::report::{
    CORRELATION_FILE_NAME, CROSSTAB_FILE_NAME, DEPARTMENT_SUMMARY_FILE_NAME,
    write_correlation_csv, write_crosstab_csv, write_department_summary_csv,
};
use crate::stats::{HISTOGRAM_BINS, gaussian_kde, histogram};
use crate::tables::{
    admission_type_vs_outcome, correlation_matrix, department_summary, gender_counts,
    grouped_values, top_diseases,
};

pub const REPORT_FILE_NAME: &str = "analysis_report.json";

/// Evaluation points of the age density curve.
const KDE_POINTS: usize = 200;

type Unit = fn(&AnalysisEngine, &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError>;

/// Entry point for the analysis stage.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    options: AnalyzeOptions,
}

impl AnalysisEngine {
    pub fn new(options: AnalyzeOptions) -> Self {
        Self { options }
    }

    /// Load the consolidated table and produce every artifact.
    ///
    /// A load failure aborts immediately. Artifacts are independent: one
    /// failing is logged and recorded, the rest are still attempted, and the
    /// run then ends with [`AnalyzeError::ArtifactsFailed`].
    pub fn run(&self) -> Result<AnalysisReport, AnalyzeError> {
        info!(
            event = "analysis_started",
            input = %self.options.input_path.display(),
            "EDA started"
        );

        let rows = load_consolidated(&self.options.input_path)?;
        info!(event = "dataset_loaded", rows = rows.len(), "cleaned dataset loaded");

        std::fs::create_dir_all(&self.options.figures_dir)?;
        std::fs::create_dir_all(&self.options.reports_dir)?;

        let units: [(&str, Unit); 8] = [
            ("age_distribution", Self::age_distribution),
            ("gender_distribution", Self::gender_distribution),
            ("top_diseases", Self::top_diseases),
            ("length_of_stay_by_department", Self::stay_by_department),
            ("treatment_cost_by_outcome", Self::cost_by_outcome),
            ("admission_type_vs_outcome", Self::admission_type_vs_outcome),
            ("correlation_matrix", Self::correlation),
            ("department_summary", Self::department_summary),
        ];

        let mut artifacts = Vec::with_capacity(units.len());
        for (name, unit) in units {
            match unit(self, &rows) {
                Ok(paths) => {
                    let files: Vec<String> = paths
                        .iter()
                        .filter_map(|path| path.file_name())
                        .map(|file| file.to_string_lossy().into_owned())
                        .collect();
                    info!(
                        event = "artifact_written",
                        artifact = name,
                        files = ?files,
                        "saved {name}"
                    );
                    artifacts.push(ArtifactReport {
                        name: name.to_string(),
                        status: ArtifactStatus::Written,
                        files,
                        error: None,
                    });
                }
                Err(err) => {
                    error!(
                        event = "artifact_failed",
                        artifact = name,
                        error = %err,
                        "failed to produce {name}"
                    );
                    artifacts.push(ArtifactReport {
                        name: name.to_string(),
                        status: ArtifactStatus::Failed,
                        files: Vec::new(),
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let report = AnalysisReport {
            rows_loaded: rows.len() as u64,
            artifacts,
        };
        write_json_atomic(&self.options.reports_dir.join(REPORT_FILE_NAME), &report)?;

        let failed = report.failed();
        if failed > 0 {
            return Err(AnalyzeError::ArtifactsFailed {
                failed,
                total: report.artifacts.len(),
            });
        }
        info!(event = "analysis_completed", "EDA completed");
        Ok(report)
    }

    fn figure(&self, file: &str) -> PathBuf {
        self.options.figures_dir.join(file)
    }

    fn report_file(&self, file: &str) -> PathBuf {
        self.options.reports_dir.join(file)
    }

    fn age_distribution(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let ages: Vec<f64> = rows.iter().filter_map(|row| row.age.map(f64::from)).collect();
        let hist = histogram(&ages, HISTOGRAM_BINS).ok_or(AnalyzeError::EmptyColumn("age"))?;
        // Density scaled to the count axis of the histogram.
        let scale = ages.len() as f64 * hist.bin_width();
        let density: Option<Vec<(f64, f64)>> = gaussian_kde(&ages, KDE_POINTS)
            .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect());

        let path = self.figure(AGE_DISTRIBUTION_FILE_NAME);
        histogram_chart(
            &path,
            self.options.chart_size,
            "Age Distribution of Patients",
            "Age",
            &hist,
            density.as_deref(),
        )?;
        Ok(vec![path])
    }

    fn gender_distribution(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let counts = gender_counts(rows);
        if counts.is_empty() {
            return Err(AnalyzeError::EmptyColumn("gender"));
        }
        let path = self.figure(GENDER_DISTRIBUTION_FILE_NAME);
        bar_chart(&path, self.options.chart_size, "Gender Distribution", "Gender", &counts)?;
        Ok(vec![path])
    }

    fn top_diseases(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let ranked = top_diseases(rows);
        if ranked.is_empty() {
            return Err(AnalyzeError::EmptyColumn("disease"));
        }
        let path = self.figure(TOP_DISEASES_FILE_NAME);
        bar_chart(&path, self.options.chart_size, "Top 10 Diseases", "Disease", &ranked)?;
        Ok(vec![path])
    }

    fn stay_by_department(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let groups = grouped_values(
            rows,
            |row| row.department.as_deref(),
            |row| row.length_of_stay.map(|stay| stay as f64),
        );
        if groups.is_empty() {
            return Err(AnalyzeError::EmptyColumn("department"));
        }
        let path = self.figure(STAY_BY_DEPARTMENT_FILE_NAME);
        boxplot_chart(
            &path,
            self.options.chart_size,
            "Length of Stay by Department",
            "Department",
            "Length of stay (days)",
            &groups,
        )?;
        Ok(vec![path])
    }

    fn cost_by_outcome(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let groups = grouped_values(
            rows,
            |row| row.outcome.as_deref(),
            |row| row.treatment_cost.map(|cost| cost as f64),
        );
        if groups.is_empty() {
            return Err(AnalyzeError::EmptyColumn("treatment_cost"));
        }
        let path = self.figure(COST_BY_OUTCOME_FILE_NAME);
        boxplot_chart(
            &path,
            self.options.chart_size,
            "Treatment Cost by Outcome",
            "Outcome",
            "Treatment cost",
            &groups,
        )?;
        Ok(vec![path])
    }

    fn admission_type_vs_outcome(
        &self,
        rows: &[ConsolidatedRecord],
    ) -> Result<Vec<PathBuf>, AnalyzeError> {
        let table = admission_type_vs_outcome(rows);
        if table.row_labels.is_empty() {
            return Err(AnalyzeError::EmptyColumn("admission_type"));
        }
        let csv_path = self.report_file(CROSSTAB_FILE_NAME);
        write_crosstab_csv(&csv_path, "admission_type", &table)?;

        let chart_path = self.figure(CROSSTAB_CHART_FILE_NAME);
        stacked_bar_chart(
            &chart_path,
            self.options.chart_size,
            "Admission Type vs Outcome",
            "Admission type",
            &table,
        )?;
        Ok(vec![csv_path, chart_path])
    }

    fn correlation(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let matrix = correlation_matrix(rows);
        let csv_path = self.report_file(CORRELATION_FILE_NAME);
        write_correlation_csv(&csv_path, &matrix)?;

        let chart_path = self.figure(CORRELATION_HEATMAP_FILE_NAME);
        correlation_heatmap(&chart_path, self.options.chart_size, "Correlation Heatmap", &matrix)?;
        Ok(vec![csv_path, chart_path])
    }

    fn department_summary(&self, rows: &[ConsolidatedRecord]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let summary = department_summary(rows);
        let path = self.report_file(DEPARTMENT_SUMMARY_FILE_NAME);
        write_department_summary_csv(&path, &summary)?;
        Ok(vec![path])
    }
}

/// Read the consolidated table, requiring the full column set.
pub fn load_consolidated(path: &Path) -> Result<Vec<ConsolidatedRecord>, AnalyzeError> {
    let load_error = |message: String| AnalyzeError::Load {
        path: path.display().to_string(),
        message,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|err| load_error(err.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|err| load_error(err.to_string()))?
        .clone();
    if let Some(missing) = CONSOLIDATED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(load_error(format!("missing column '{missing}'")));
    }

    reader
        .deserialize()
        .collect::<Result<Vec<ConsolidatedRecord>, csv::Error>>()
        .map_err(|err| load_error(err.to_string()))
}
