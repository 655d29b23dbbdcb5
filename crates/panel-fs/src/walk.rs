//! Installed-package enumeration
//!
//! A package directory is any directory (or symlink resolving to one) that
//! holds a [`PackagePath::Manifest`] file. Both walkers are lazy iterators
//! that re-read the filesystem every time they are constructed. Missing or
//! unreadable directories produce no entries instead of errors.

use std::fs::{self, FileType, ReadDir};
use std::path::{Path, PathBuf};

use crate::constants::{PackagePath, SCOPE_MARKER};
use crate::io;

/// Whether `dir` is an installed package, given the entry's own file type
/// (as reported without following symlinks).
pub fn is_package_dir(dir: &Path, file_type: FileType) -> bool {
    if file_type.is_dir() {
        return io::exists(&dir.join(PackagePath::Manifest));
    }

    if file_type.is_symlink() {
        let Some(meta) = io::safe_metadata(dir) else {
            return false;
        };
        return meta.is_dir() && io::exists(&dir.join(PackagePath::Manifest));
    }

    false
}

fn open(dir: &Path) -> Option<ReadDir> {
    match fs::read_dir(dir) {
        Ok(entries) => Some(entries),
        Err(e) => {
            tracing::trace!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            None
        }
    }
}

/// Walks a package-manager install tree (e.g. `node_modules`).
///
/// Hidden entries are ignored. Scope directories (`@scope`) are descended
/// into, symlinked packages are followed, and everything else is yielded
/// only if it carries a manifest.
#[derive(Debug)]
pub struct PackageTreeWalker {
    stack: Vec<ReadDir>,
}

impl PackageTreeWalker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            stack: open(root.as_ref()).into_iter().collect(),
        }
    }
}

impl Iterator for PackageTreeWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(entries) = self.stack.last_mut() {
            let Some(entry) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let Ok(entry) = entry else {
                continue;
            };

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let full = entry.path();

            if file_type.is_dir() && name.starts_with(SCOPE_MARKER) {
                if let Some(scoped) = open(&full) {
                    self.stack.push(scoped);
                }
                continue;
            }

            if is_package_dir(&full, file_type) {
                return Some(full);
            }
        }

        None
    }
}

/// Single-level scan of a plain directory of packages.
///
/// Unlike [`PackageTreeWalker`] this neither skips hidden entries nor
/// descends into scope directories.
#[derive(Debug)]
pub struct DirScan {
    entries: Option<ReadDir>,
}

impl DirScan {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            entries: open(dir.as_ref()),
        }
    }
}

impl Iterator for DirScan {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let entries = self.entries.as_mut()?;
        for entry in entries.by_ref() {
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let full = entry.path();
            if is_package_dir(&full, file_type) {
                return Some(full);
            }
        }
        self.entries = None;
        None
    }
}
