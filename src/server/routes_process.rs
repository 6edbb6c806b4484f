//! Pipeline orchestration route.

use crate::error::Error;
use crate::pipeline::JobOutcome;
use crate::server::error::AppError;
use crate::server::AppContext;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub input_folder: Option<String>,
    pub output_folder: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub message: String,
    /// Combined stdout + stderr of the pipeline, for operator inspection.
    pub output: String,
    pub output_folder: String,
}

/// POST /process
///
/// Runs the clip-generation pipeline over an input folder. The request
/// blocks until the pipeline terminates; concurrent requests are not
/// serialized, so overlapping output folders race at the filesystem level.
pub async fn process_videos(
    State(ctx): State<AppContext>,
    Json(payload): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    let input_folder = payload
        .input_folder
        .ok_or_else(|| Error::Validation("inputFolder is required".into()))?;

    let report = ctx
        .pipeline
        .run_job(&ctx.library, &input_folder, payload.output_folder.as_deref())
        .await?;

    match report.outcome {
        JobOutcome::Success => Ok(Json(ProcessResponse {
            message: "Videos processed successfully".to_string(),
            output: report.combined_output(),
            output_folder: report.output_dir.to_string_lossy().into_owned(),
        })),
        JobOutcome::Failure => Err(Error::JobFailed {
            details: report.stderr,
        }
        .into()),
    }
}
