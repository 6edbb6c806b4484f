//! Listing and diagnostic routes.

use crate::error::Error;
use crate::library::VideoEntry;
use crate::server::error::AppError;
use crate::server::AppContext;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct VideosQuery {
    folder: Option<String>,
}

/// GET /videos?folder=<relative-path>
///
/// Lists the clips of a folder in enumeration order with sidecar scores
/// attached by position. Re-scans the directory on every call.
pub async fn list_videos(
    State(ctx): State<AppContext>,
    Query(params): Query<VideosQuery>,
) -> Result<Json<Vec<VideoEntry>>, AppError> {
    let folder = params
        .folder
        .ok_or_else(|| Error::Validation("folder parameter is required".into()))?;

    let entries = ctx.library.list_folder(&folder)?;
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct CheckQuery {
    path: Option<String>,
}

#[derive(Serialize)]
pub struct CheckResponse {
    pub exists: bool,
    #[serde(rename = "isFile", skip_serializing_if = "Option::is_none")]
    pub is_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub path: String,
}

/// GET /check?path=<relative-path>
///
/// Diagnostic endpoint: reports whether a logical path resolves to an
/// existing file or directory, with its size.
pub async fn check_path(
    State(ctx): State<AppContext>,
    Query(params): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, AppError> {
    let logical = params
        .path
        .ok_or_else(|| Error::Validation("path parameter is required".into()))?;

    let resolved = ctx.library.resolve(&logical)?;
    let path = resolved.to_string_lossy().into_owned();

    let response = match tokio::fs::metadata(&resolved).await {
        Ok(meta) => CheckResponse {
            exists: true,
            is_file: Some(meta.is_file()),
            size: Some(meta.len()),
            path,
        },
        Err(_) => CheckResponse {
            exists: false,
            is_file: None,
            size: None,
            path,
        },
    };

    Ok(Json(response))
}
