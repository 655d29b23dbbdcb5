//! Filesystem primitives for smart-panel extension discovery
//!
//! Provides separator-agnostic path handling, tolerant manifest reads and
//! the package-tree walkers used to enumerate installed packages.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use constants::PackagePath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::{DirScan, PackageTreeWalker, is_package_dir};
