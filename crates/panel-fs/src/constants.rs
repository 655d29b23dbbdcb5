//! Well-known names inside package-manager install trees.

use std::path::Path;

/// Marker prefix of scope directories such as `@fastybird`.
pub const SCOPE_MARKER: char = '@';

/// Standard file and directory names of a package-manager layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagePath {
    /// The package descriptor file (`package.json`)
    Manifest,
    /// The install directory holding installed packages (`node_modules`)
    InstallDir,
    /// Workspace directory grouping application packages (`apps`)
    AppsDir,
    /// The application's own backend package (`backend`)
    BackendApp,
    /// Global npm install root segment (`npm`)
    NpmDir,
}

impl PackagePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "package.json",
            Self::InstallDir => "node_modules",
            Self::AppsDir => "apps",
            Self::BackendApp => "backend",
            Self::NpmDir => "npm",
        }
    }
}

impl AsRef<Path> for PackagePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PackagePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PackagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
