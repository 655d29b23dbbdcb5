//! Backend entry-module resolution.
//!
//! The two module formats are not interchangeable: an ES module must be
//! handed to the loader as a `file://` URL, a legacy module as a plain
//! absolute path. [`EntryModule`] carries that choice so each loader
//! strategy only ever sees the form it expects.

use std::path::{Path, PathBuf};

use panel_fs::NormalizedPath;
use url::Url;

use crate::error::{Error, Result};
use crate::manifest::PackageManifest;

/// File extension that marks an entry as an ES module regardless of the
/// package-level marker.
pub const ES_MODULE_EXTENSION: &str = "mjs";

/// A resolved backend entry, tagged by module format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryModule {
    /// ES module, imported through its file URL.
    EsModule { url: Url, path: PathBuf },
    /// Legacy module, required by absolute path.
    Legacy { path: PathBuf },
}

impl EntryModule {
    /// Classify the entry file at `path` for the package described by `manifest`.
    ///
    /// The path is made absolute and lexically cleaned before a URL is built.
    pub fn for_file(manifest: &PackageManifest, path: &Path) -> Result<Self> {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let path = NormalizedPath::new(&absolute).resolve_dots().to_native();

        if is_es_module(manifest, &path) {
            let url = Url::from_file_path(&path)
                .map_err(|()| Error::InvalidEntryUrl(path.display().to_string()))?;
            Ok(Self::EsModule { url, path })
        } else {
            Ok(Self::Legacy { path })
        }
    }

    /// The absolute entry path.
    pub fn path(&self) -> &Path {
        match self {
            Self::EsModule { path, .. } | Self::Legacy { path } => path,
        }
    }

    pub fn is_es_module(&self) -> bool {
        matches!(self, Self::EsModule { .. })
    }
}

/// ES module if the package says so or the entry file ends in `.mjs`.
pub fn is_es_module(manifest: &PackageManifest, entry: &Path) -> bool {
    manifest.is_es_module_package()
        || entry
            .extension()
            .is_some_and(|ext| ext == ES_MODULE_EXTENSION)
}
