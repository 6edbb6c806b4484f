//! External pipeline orchestration.
//!
//! Runs the clip-generation pipeline as a subprocess with an explicit
//! argument vector (no shell interpretation), captures its output streams,
//! and classifies the result. Jobs are per-invocation: nothing is persisted
//! and concurrent jobs are not serialized against each other.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::library::Library;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// Directory created under the input folder when the caller does not name
/// an output folder.
pub const DEFAULT_OUTPUT_DIR: &str = "Viral_Clips";

/// Classified result of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failure,
}

/// Everything captured from one pipeline invocation.
#[derive(Debug)]
pub struct JobReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub outcome: JobOutcome,
}

impl JobReport {
    /// Combined stdout + stderr, the informational log reported on success.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Classify a finished pipeline run.
///
/// A non-zero (or signal) exit is always a failure. The pipeline's logging
/// goes to stderr, so for a clean exit stderr is only treated as a failure
/// signal when it contains something other than INFO-level log lines.
fn classify(exit_code: Option<i32>, stderr: &str) -> JobOutcome {
    match exit_code {
        Some(0) => {
            if !stderr.is_empty() && !stderr.contains("INFO") {
                JobOutcome::Failure
            } else {
                JobOutcome::Success
            }
        }
        _ => JobOutcome::Failure,
    }
}

/// Runs the external clip-generation pipeline.
pub struct PipelineRunner {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl PipelineRunner {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// The program this runner invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Orchestrate one pipeline job.
    ///
    /// Resolves both folders under the library root, verifies the input
    /// exists before any mutation, creates the output directory
    /// (idempotent), then blocks on the subprocess until it terminates.
    pub async fn run_job(
        &self,
        library: &Library,
        input_folder: &str,
        output_folder: Option<&str>,
    ) -> Result<JobReport> {
        if input_folder.trim().is_empty() {
            return Err(Error::Validation("inputFolder is required".into()));
        }

        let input_dir = library.resolve(input_folder)?;
        if !input_dir.is_dir() {
            return Err(Error::not_found("input folder", input_folder));
        }

        let output_dir = match output_folder {
            Some(folder) => library.resolve(folder)?,
            None => input_dir.join(DEFAULT_OUTPUT_DIR),
        };

        tokio::fs::create_dir_all(&output_dir).await?;

        let report = self.invoke(&input_dir, &output_dir).await?;

        match report.outcome {
            JobOutcome::Success => {
                info!(
                    "Pipeline finished: {:?} -> {:?} (exit {:?})",
                    input_dir, output_dir, report.exit_code
                );
            }
            JobOutcome::Failure => {
                warn!(
                    "Pipeline failed: {:?} -> {:?} (exit {:?})",
                    input_dir, output_dir, report.exit_code
                );
            }
        }

        Ok(report)
    }

    /// Spawn the pipeline with exactly two positional arguments appended:
    /// absolute input directory and absolute output directory.
    async fn invoke(&self, input_dir: &Path, output_dir: &Path) -> Result<JobReport> {
        info!(
            "Invoking pipeline: {} {:?} {:?} {:?}",
            self.program, self.args, input_dir, output_dir
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(input_dir)
            .arg(output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| Error::process_start(&self.program, e.to_string()))?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::JobFailed {
                    details: format!("pipeline timed out after {:?}", limit),
                })??,
            None => child.wait_with_output().await?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();

        Ok(JobReport {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            exit_code,
            outcome: classify(exit_code, &stderr),
            stdout,
            stderr,
        })
    }
}
