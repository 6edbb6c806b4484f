//! Media library: path resolution and folder listings.
//!
//! This module maps logical (relative) identifiers onto the configured root
//! directory and produces folder listings with sidecar metadata attached.

pub mod sidecar;

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub use sidecar::{ClipMetadata, SIDECAR_FILE};

/// One entry of a folder listing: a clip plus its servable URL and scores.
#[derive(Debug, Clone, Serialize)]
pub struct VideoEntry {
    /// File name as it appears on disk.
    pub name: String,
    /// URL the clip can be streamed from.
    pub path: String,
    /// Scores from the sidecar file; `{}` when the sidecar has no entry at
    /// this position.
    pub metadata: ClipMetadata,
}

/// The media library rooted at a single configured directory.
///
/// All logical folder/file identifiers are resolved relative to the root;
/// identifiers that escape it are rejected before any filesystem access.
pub struct Library {
    root: PathBuf,
    base_url: String,
}

impl Library {
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self { root, base_url }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical identifier to an absolute path under the root.
    ///
    /// The identifier is normalized lexically: `.` segments are dropped and
    /// `..` segments pop the previously pushed segment. Any identifier that
    /// would climb above the root (or is absolute) is rejected without
    /// touching the filesystem.
    pub fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in Path::new(logical).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(Error::Validation(format!(
                            "path escapes library root: {logical}"
                        )));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::Validation(format!(
                        "path must be relative: {logical}"
                    )));
                }
            }
        }

        Ok(resolved)
    }

    /// List the clips of a logical folder, pairing each with the sidecar
    /// entry at the same position.
    ///
    /// Clips are reported in directory enumeration order, which is the order
    /// the pipeline's sidecar entries are aligned to. Every call re-reads
    /// the directory and the sidecar; nothing is cached.
    pub fn list_folder(&self, folder: &str) -> Result<Vec<VideoEntry>> {
        let dir = self.resolve(folder)?;

        if !dir.is_dir() {
            return Err(Error::not_found("folder", folder));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if let Ok(name) = entry.file_name().into_string() {
                if is_clip_file(&name) {
                    names.push(name);
                }
            }
        }

        let metadata = sidecar::load_sidecar(&dir)?;
        debug!(
            "Listing {:?}: {} clips, {} sidecar entries",
            dir,
            names.len(),
            metadata.len()
        );

        let mut metadata = metadata.into_iter();
        let entries = names
            .into_iter()
            .map(|name| {
                let path = format!(
                    "{}/stream/{}/{}",
                    self.base_url,
                    urlencoding::encode(folder),
                    urlencoding::encode(&name)
                );
                VideoEntry {
                    name,
                    path,
                    metadata: metadata.next().unwrap_or_default(),
                }
            })
            .collect();

        Ok(entries)
    }
}

/// True for the clip extensions the pipeline produces. Exact suffix match,
/// case-sensitive.
pub fn is_clip_file(name: &str) -> bool {
    name.ends_with(".mp4") || name.ends_with(".mov")
}
