//! Sidecar metadata file parsing.
//!
//! The pipeline writes a `viral_clips_metadata.json` file next to its output
//! clips: a JSON array of per-clip quality scores, one element per clip in
//! the order the clips were produced.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name the pipeline uses for its metadata sidecar.
pub const SIDECAR_FILE: &str = "viral_clips_metadata.json";

/// Per-clip quality scores produced by the pipeline.
///
/// Every field is optional: the pipeline may omit scores, and entries past
/// the end of the sidecar array get a fully empty record, which serializes
/// as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClipMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entertainment_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub educational_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareability_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_hook: Option<String>,
}

impl ClipMetadata {
    /// True when no score or hook is present.
    pub fn is_empty(&self) -> bool {
        *self == ClipMetadata::default()
    }
}

/// Load the sidecar array from `dir`, returning an empty sequence when the
/// file does not exist.
///
/// A present-but-unparseable sidecar is an error: silently dropping scores
/// would misreport every clip in the folder.
pub fn load_sidecar(dir: &Path) -> Result<Vec<ClipMetadata>> {
    let path = dir.join(SIDECAR_FILE);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&raw)
        .map_err(|e| Error::Internal(format!("Malformed sidecar {:?}: {e}", path)))
}
