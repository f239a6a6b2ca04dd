mod config;
mod logging;
mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hospital_eda_analyze::{AnalysisEngine, AnalyzeError};
use hospital_eda_clean::{CleanError, CleaningEngine};
use hospital_eda_generate::{GenerationEngine, GenerationError};
use thiserror::Error;

use config::{ConfigError, GenerateOverrides, PipelineConfig, ResolvedPaths, load_or_create};
use logging::{LoggingError, init_logging};
use pipeline::{PipelineError, run_pipeline};

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("generation failed: {0}")]
    Generate(#[from] GenerationError),
    #[error("cleaning failed: {0}")]
    Clean(#[from] CleanError),
    #[error("analysis failed: {0}")]
    Analyze(#[from] AnalyzeError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Parser, Debug)]
#[command(
    name = "hospital-eda",
    version,
    about = "Synthetic hospital patient data: generate, clean, analyze"
)]
struct Cli {
    /// Pipeline configuration file; created with defaults when missing.
    #[arg(long, global = true, default_value = "config/config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the five raw tables.
    Generate(GenerateArgs),
    /// Join and clean the raw tables into the consolidated table.
    Clean,
    /// Produce charts and summary reports from the consolidated table.
    Analyze,
    /// Run generate, clean and analyze in order, each as its own process.
    Run,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of patients (overrides data.num_patients).
    #[arg(long)]
    patients: Option<usize>,
    /// RNG seed (overrides data.seed).
    #[arg(long)]
    seed: Option<u64>,
    /// Last admission date, YYYY-MM-DD (overrides data.reference_date).
    #[arg(long, value_name = "DATE")]
    reference_date: Option<NaiveDate>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Load the config, install logging, then dispatch. A config or logging
/// failure happens before any subscriber exists, so it reaches stderr only.
fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_or_create(&cli.config)?;
    let paths = config.resolve_paths(&cli.config);
    let log_path = init_logging(&paths.logs, &config.logging)?;
    tracing::debug!(
        event = "logging_initialized",
        config = %cli.config.display(),
        log = %log_path.display()
    );

    match cli.command {
        Command::Generate(args) => run_generate(&config, &paths, args),
        Command::Clean => run_clean(&config, &paths),
        Command::Analyze => run_analyze(&config, &paths),
        Command::Run => run_all(&cli.config),
    }
}

fn run_generate(
    config: &PipelineConfig,
    paths: &ResolvedPaths,
    args: GenerateArgs,
) -> Result<(), CliError> {
    let overrides = GenerateOverrides {
        num_patients: args.patients,
        seed: args.seed,
        reference_date: args.reference_date,
    };
    let options = config.generate_options(paths, overrides)?;
    let result = GenerationEngine::new(options).run()?;
    println!(
        "generated {} patients (seed {}) into {}",
        result.report.num_patients,
        result.report.seed,
        result.out_dir.display()
    );
    Ok(())
}

fn run_clean(config: &PipelineConfig, paths: &ResolvedPaths) -> Result<(), CliError> {
    let result = CleaningEngine::new(config.clean_options(paths)).run()?;
    println!(
        "cleaned {} -> {} rows into {}",
        result.report.rows_before,
        result.report.rows_after,
        result.output_path.display()
    );
    Ok(())
}

fn run_analyze(config: &PipelineConfig, paths: &ResolvedPaths) -> Result<(), CliError> {
    let report = AnalysisEngine::new(config.analyze_options(paths)).run()?;
    println!(
        "analyzed {} rows: {} artifacts in {} and {}",
        report.rows_loaded,
        report.artifacts.len(),
        paths.figures.display(),
        paths.reports.display()
    );
    Ok(())
}

fn run_all(config_path: &Path) -> Result<(), CliError> {
    run_pipeline(config_path)?;
    println!("pipeline completed");
    Ok(())
}
