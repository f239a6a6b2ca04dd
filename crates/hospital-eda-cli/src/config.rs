use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hospital_eda_analyze::{AnalyzeOptions, ChartSize};
use hospital_eda_clean::CleanOptions;
use hospital_eda_core::{CLEANED_FILE_NAME, DiseaseCatalog, write_atomic};
use hospital_eda_generate::GenerateOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    TomlDecode {
        path: String,
        source: toml::de::Error,
    },
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Catalog(#[from] hospital_eda_core::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Pipeline configuration, read from `config/config.toml` by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub plots: PlotsConfig,
    /// Department name → diseases, replacing the built-in lists.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub diseases: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_data: PathBuf,
    pub processed_data: PathBuf,
    pub figures: PathBuf,
    pub reports: PathBuf,
    pub logs: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/raw"),
            processed_data: PathBuf::from("data/processed"),
            figures: PathBuf::from("outputs/figures"),
            reports: PathBuf::from("outputs/reports"),
            logs: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub num_patients: usize,
    pub seed: u64,
    /// Last day of the admission window; today when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            num_patients: 1000,
            seed: 42,
            reference_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub file_name: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_name: "pipeline.log".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotsConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotsConfig {
    fn default() -> Self {
        let size = ChartSize::default();
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Directories with relative entries resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub raw_data: PathBuf,
    pub processed_data: PathBuf,
    pub figures: PathBuf,
    pub reports: PathBuf,
    pub logs: PathBuf,
}

/// Generation knobs that the command line may override.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOverrides {
    pub num_patients: Option<usize>,
    pub seed: Option<u64>,
    pub reference_date: Option<NaiveDate>,
}

/// Read `path`, or write the defaults there when it does not exist yet.
pub fn load_or_create(path: &Path) -> ConfigResult<PipelineConfig> {
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(io_error)?;
        let config: PipelineConfig =
            toml::from_str(&content).map_err(|source| ConfigError::TomlDecode {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        return Ok(config);
    }

    let config = PipelineConfig::default();
    let encoded = toml::to_string_pretty(&config)?;
    write_atomic(path, |file| file.write_all(encoded.as_bytes())).map_err(io_error)?;
    Ok(config)
}

/// Project root for a config file: the parent of a `config/` directory, or
/// the directory holding the file.
pub fn base_dir(config_path: &Path) -> PathBuf {
    let parent = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if parent.file_name().is_some_and(|name| name == "config") {
        match parent.parent() {
            Some(root) if !root.as_os_str().is_empty() => root.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        parent.to_path_buf()
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.plots.width == 0 || self.plots.height == 0 {
            return Err(ConfigError::Invalid(
                "plots.width and plots.height must be positive".to_string(),
            ));
        }
        if self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve_paths(&self, config_path: &Path) -> ResolvedPaths {
        let root = base_dir(config_path);
        ResolvedPaths {
            raw_data: root.join(&self.paths.raw_data),
            processed_data: root.join(&self.paths.processed_data),
            figures: root.join(&self.paths.figures),
            reports: root.join(&self.paths.reports),
            logs: root.join(&self.paths.logs),
        }
    }

    pub fn catalog(&self) -> ConfigResult<DiseaseCatalog> {
        if self.diseases.is_empty() {
            return Ok(DiseaseCatalog::default());
        }
        Ok(DiseaseCatalog::with_overrides(&self.diseases)?)
    }

    pub fn generate_options(
        &self,
        paths: &ResolvedPaths,
        overrides: GenerateOverrides,
    ) -> ConfigResult<GenerateOptions> {
        Ok(GenerateOptions {
            out_dir: paths.raw_data.clone(),
            num_patients: overrides.num_patients.unwrap_or(self.data.num_patients),
            seed: overrides.seed.unwrap_or(self.data.seed),
            reference_date: overrides
                .reference_date
                .or(self.data.reference_date)
                .unwrap_or_else(|| Local::now().date_naive()),
            catalog: self.catalog()?,
        })
    }

    pub fn clean_options(&self, paths: &ResolvedPaths) -> CleanOptions {
        CleanOptions {
            raw_dir: paths.raw_data.clone(),
            processed_dir: paths.processed_data.clone(),
        }
    }

    pub fn analyze_options(&self, paths: &ResolvedPaths) -> AnalyzeOptions {
        AnalyzeOptions {
            input_path: paths.processed_data.join(CLEANED_FILE_NAME),
            figures_dir: paths.figures.clone(),
            reports_dir: paths.reports.clone(),
            chart_size: ChartSize {
                width: self.plots.width,
                height: self.plots.height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use hospital_eda_core::Department;

    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("hospital_eda_config_{label}_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [data]
            num_patients = 250

            [logging]
            format = "json"
            "#,
        )
        .expect("parse");

        assert_eq!(config.data.num_patients, 250);
        assert_eq!(config.data.seed, 42);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.file_name, "pipeline.log");
        assert_eq!(config.paths, PathsConfig::default());
        assert_eq!(config.plots.width, 1000);
    }

    #[test]
    fn reference_date_and_diseases_parse() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [data]
            reference_date = "2026-03-31"

            [diseases]
            Cardiology = ["Arrhythmia"]
            "#,
        )
        .expect("parse");

        assert_eq!(
            config.data.reference_date,
            NaiveDate::from_ymd_opt(2026, 3, 31)
        );
        let catalog = config.catalog().expect("catalog");
        assert_eq!(
            catalog.diseases_for(Department::Cardiology).expect("cardiology"),
            ["Arrhythmia".to_string()]
        );
    }

    #[test]
    fn unknown_department_override_is_rejected() {
        let mut config = PipelineConfig::default();
        config
            .diseases
            .insert("Dermatology".to_string(), vec!["Eczema".to_string()]);
        assert!(matches!(config.catalog(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let root = temp_dir("create");
        let path = root.join("config").join("config.toml");

        let created = load_or_create(&path).expect("create");
        assert_eq!(created, PipelineConfig::default());
        assert!(path.exists());

        let reloaded = load_or_create(&path).expect("reload");
        assert_eq!(reloaded, created);
    }

    #[test]
    fn invalid_toml_is_fatal() {
        let root = temp_dir("invalid");
        let path = root.join("config.toml");
        std::fs::write(&path, "[data\nseed = ").expect("write");
        let err = load_or_create(&path).expect_err("invalid toml");
        assert!(matches!(err, ConfigError::TomlDecode { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn zero_sized_plots_are_rejected() {
        let root = temp_dir("plots");
        let path = root.join("config.toml");
        std::fs::write(&path, "[plots]\nwidth = 0\n").expect("write");
        assert!(matches!(load_or_create(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn paths_resolve_against_project_root() {
        let config = PipelineConfig::default();

        let paths = config.resolve_paths(Path::new("/srv/eda/config/config.toml"));
        assert_eq!(paths.raw_data, PathBuf::from("/srv/eda/data/raw"));
        assert_eq!(paths.logs, PathBuf::from("/srv/eda/logs"));

        let paths = config.resolve_paths(Path::new("/srv/eda/settings.toml"));
        assert_eq!(paths.figures, PathBuf::from("/srv/eda/outputs/figures"));

        assert_eq!(base_dir(Path::new("config/config.toml")), PathBuf::from("."));
        assert_eq!(base_dir(Path::new("config.toml")), PathBuf::from("."));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = PipelineConfig::default();
        let paths = config.resolve_paths(Path::new("/srv/eda/config/config.toml"));
        let options = config
            .generate_options(
                &paths,
                GenerateOverrides {
                    num_patients: Some(5),
                    seed: None,
                    reference_date: NaiveDate::from_ymd_opt(2026, 1, 1),
                },
            )
            .expect("options");

        assert_eq!(options.num_patients, 5);
        assert_eq!(options.seed, 42);
        assert_eq!(options.reference_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(options.out_dir, PathBuf::from("/srv/eda/data/raw"));

        let analyze = config.analyze_options(&paths);
        assert_eq!(
            analyze.input_path,
            PathBuf::from("/srv/eda/data/processed/hospital_patient_cleaned.csv")
        );
        assert_eq!(analyze.chart_size, ChartSize::default());
    }
}
