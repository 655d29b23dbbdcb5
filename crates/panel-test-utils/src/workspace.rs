//! [`TestWorkspace`] for discovery scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::package::PackageBuilder;

/// A temporary directory shaped like a monorepo checkout.
///
/// Paths passed to the helpers are relative to the workspace root, e.g.
/// `"apps/backend/node_modules"`.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create directory `rel` and return its absolute path.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Install `pkg` into the install tree at `tree` under its own name
    /// (`tree/@scope/name` for scoped names). Returns the package directory.
    ///
    /// # Panics
    /// Panics if `pkg` has no name; use [`TestWorkspace::install_at`].
    pub fn install(&self, tree: &str, pkg: &PackageBuilder) -> PathBuf {
        let name = pkg
            .name()
            .expect("TestWorkspace::install: package has no name");
        pkg.write_to(&self.path(tree).join(name))
    }

    /// Write `pkg` into directory `rel`.
    pub fn install_at(&self, rel: &str, pkg: &PackageBuilder) -> PathBuf {
        pkg.write_to(&self.path(rel))
    }

    /// Write a literal `package.json` into directory `rel`.
    pub fn write_manifest(&self, rel: &str, content: &str) -> PathBuf {
        let dir = self.dir(rel);
        fs::write(dir.join("package.json"), content).unwrap();
        dir
    }

    /// Symlink `link` to `target`, both relative to the root.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) -> PathBuf {
        let link_path = self.path(link);
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        std::os::unix::fs::symlink(self.path(target), &link_path).unwrap();
        link_path
    }
}
