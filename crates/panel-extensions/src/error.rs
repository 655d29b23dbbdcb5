use std::path::PathBuf;

/// Errors that can occur in the extension system.
///
/// Discovery itself swallows almost all of these; they surface from the
/// lower-level operations (loading an entry, reading config, resolving an
/// admin asset) for callers that need the reason.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A backend entry file declared by a package is missing on disk.
    #[error("Extension entry not found: {path}. Did you build the extension? (e.g. \"pnpm -F {package} build\")")]
    EntryNotFound { path: PathBuf, package: String },

    /// The entry path could not be expressed as a `file://` URL.
    #[error("cannot express extension entry {0} as a file URL")]
    InvalidEntryUrl(String),

    /// The loader has no module for the requested entry.
    #[error("no extension module registered for {0}")]
    ModuleNotFound(PathBuf),

    /// The loader found the entry but could not load it.
    #[error("failed to load extension module {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    /// Failed to parse the package manifest JSON.
    #[error("failed to parse package manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),

    /// Failed to parse discovery config TOML.
    #[error("failed to parse discovery config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Discovery config file not found at the expected path.
    #[error("discovery config not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The process working directory is unavailable.
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// The configured application root cannot be made absolute.
    #[error("cannot resolve application root {path:?}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An admin asset request was empty.
    #[error("missing asset path")]
    EmptyAssetPath,

    /// An admin asset request resolved outside its package directory.
    #[error("asset path escapes package directory: {0}")]
    PathTraversal(String),

    /// Filesystem error from panel-fs.
    #[error(transparent)]
    Fs(#[from] panel_fs::Error),

    /// I/O error reading config files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
