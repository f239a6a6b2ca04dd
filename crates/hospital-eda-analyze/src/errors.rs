use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors emitted by the analysis stage.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
    #[error("no rows with a value for '{0}'")]
    EmptyColumn(&'static str),
    #[error("chart error: {0}")]
    Chart(String),
    #[error("{failed} of {total} artifact(s) failed")]
    ArtifactsFailed { failed: usize, total: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for AnalyzeError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        AnalyzeError::Chart(err.to_string())
    }
}
