//! Tolerant read helpers
//!
//! Discovery treats most filesystem failures as "nothing here". The strict
//! variants return [`Error`] for callers that want to report; the `_safe`
//! variants collapse every failure into `None`.

use std::fs::{self, Metadata};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_text(path)?;
    serde_json::from_str(&content).map_err(|e| Error::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and deserialize a JSON document, returning `None` on any failure.
pub fn read_json_safe<T: DeserializeOwned>(path: &Path) -> Option<T> {
    read_json(path).ok()
}

/// Metadata following symlinks, or `None` if the target cannot be stat'ed.
pub fn safe_metadata(path: &Path) -> Option<Metadata> {
    fs::metadata(path).ok()
}

/// Whether anything (file, directory, or live symlink) exists at `path`.
pub fn exists(path: &Path) -> bool {
    path.exists()
}
