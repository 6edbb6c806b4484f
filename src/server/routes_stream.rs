//! Direct streaming with HTTP range requests.
//!
//! Serves library files with full (200) and partial (206) content delivery.
//! Reads go through `ReaderStream` in 64KB chunks so memory stays bounded
//! regardless of file size, and the file handle is dropped with the stream
//! on every exit path, including client disconnects.

use crate::error::Error;
use crate::server::error::AppError;
use crate::server::AppContext;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

const CHUNK_SIZE: usize = 64 * 1024;

/// GET /stream/{*path}
pub async fn stream_file(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let file_path = ctx.library.resolve(&path)?;

    let metadata = tokio::fs::metadata(&file_path)
        .await
        .map_err(|_| Error::not_found("file", &path))?;
    if !metadata.is_file() {
        return Err(Error::not_found("file", &path).into());
    }

    let file_size = metadata.len();
    let content_type = content_type_for(&path);

    // An unparseable Range header is ignored and the full file served; only
    // a parseable-but-unsatisfiable range earns a 416.
    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_range_header);

    match range {
        Some((start, end_opt)) => {
            if start >= file_size {
                return Ok(range_not_satisfiable(file_size));
            }
            let end = end_opt.unwrap_or(file_size - 1).min(file_size - 1);
            if start > end {
                return Ok(range_not_satisfiable(file_size));
            }

            let length = end - start + 1;

            let mut file = open_file(&file_path, &path).await?;
            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|e| Error::Internal(format!("Seek failed: {e}")))?;

            let stream = ReaderStream::with_capacity(file.take(length), CHUNK_SIZE);
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| Error::Internal(e.to_string()).into())
        }
        None => {
            let file = open_file(&file_path, &path).await?;

            let stream = ReaderStream::with_capacity(file, CHUNK_SIZE);
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| Error::Internal(e.to_string()).into())
        }
    }
}

/// OPTIONS /stream/{*path}
///
/// Empty 200 for preflight; the CORS layer attaches the actual headers. No
/// file access happens here.
pub async fn stream_preflight() -> impl IntoResponse {
    StatusCode::OK
}

async fn open_file(file_path: &std::path::Path, logical: &str) -> Result<File, AppError> {
    // The file passed the metadata check already, so a failure here is an
    // I/O problem rather than a missing file.
    File::open(file_path).await.map_err(|e| {
        tracing::error!("Failed to open {:?} for streaming: {}", logical, e);
        AppError::from(Error::from(e))
    })
}

fn range_not_satisfiable(file_size: u64) -> Response {
    (
        StatusCode::RANGE_NOT_SATISFIABLE,
        [(header::CONTENT_RANGE, format!("bytes */{file_size}"))],
    )
        .into_response()
}

/// Parse a `Range: bytes=START-END` header value.
///
/// Returns `(start, Option<end>)` where `end` is `None` for open-ended
/// ranges like `bytes=500-`.
fn parse_range_header(value: &str) -> Option<(u64, Option<u64>)> {
    let bytes_prefix = value.strip_prefix("bytes=")?;
    let mut parts = bytes_prefix.splitn(2, '-');
    let start_str = parts.next()?.trim();
    let end_str = parts.next()?.trim();

    let start: u64 = start_str.parse().ok()?;
    let end: Option<u64> = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse().ok()?)
    };

    Some((start, end))
}

/// MIME type for this endpoint: everything it serves is a clip, so
/// non-`.mp4` falls through to QuickTime.
fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".mp4") {
        "video/mp4"
    } else {
        "video/quicktime"
    }
}
