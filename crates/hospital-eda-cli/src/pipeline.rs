use std::fmt;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info};

/// A pipeline stage, run as its own process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Clean,
    Analyze,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 3] = [Stage::Generate, Stage::Clean, Stage::Analyze];

    /// Subcommand that runs this stage.
    pub fn command(&self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::Clean => "clean",
            Stage::Analyze => "analyze",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot locate the current executable: {0}")]
    CurrentExe(std::io::Error),
    #[error("failed to start stage '{stage}': {source}")]
    Spawn {
        stage: Stage,
        source: std::io::Error,
    },
    #[error("pipeline stopped due to error in stage '{stage}' (exit code {})", exit_label(.code))]
    StageFailed {
        stage: Stage,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |code| code.to_string())
}

/// Run every stage in order, each as a child process of the current
/// executable sharing `config_path`. Stops at the first failing stage.
pub fn run_pipeline(config_path: &Path) -> Result<(), PipelineError> {
    let exe = std::env::current_exe().map_err(PipelineError::CurrentExe)?;
    info!(event = "pipeline_started", config = %config_path.display(), "pipeline started");
    let timer = Instant::now();

    for stage in Stage::ALL {
        run_stage(&exe, config_path, stage)?;
    }

    info!(
        event = "pipeline_completed",
        duration_ms = timer.elapsed().as_millis() as u64,
        "pipeline completed successfully"
    );
    Ok(())
}

fn run_stage(exe: &Path, config_path: &Path, stage: Stage) -> Result<(), PipelineError> {
    info!(event = "stage_started", stage = %stage, "starting stage {stage}");

    let output = Command::new(exe)
        .arg("--config")
        .arg(config_path)
        .arg(stage.command())
        .output()
        .map_err(|source| PipelineError::Spawn { stage, source })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        info!(event = "stage_stdout", stage = %stage, "stdout from {stage}:\n{}", stdout.trim_end());
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        error!(event = "stage_failed", stage = %stage, code = ?output.status.code(), "stage {stage} failed");
        error!(event = "stage_stderr", stage = %stage, "stderr:\n{stderr}");
        return Err(PipelineError::StageFailed {
            stage,
            code: output.status.code(),
            stderr,
        });
    }

    info!(event = "stage_completed", stage = %stage, "completed stage {stage}");
    Ok(())
}
