//! In-process module registry for statically linked extensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use panel_fs::NormalizedPath;
use url::Url;

use super::{LoadedModule, ModuleExports, ModuleLoader};
use crate::error::{Error, Result};

/// A [`ModuleLoader`] backed by modules registered ahead of time.
///
/// Hosts that link their extensions into the binary register each one under
/// the absolute path of the entry file its package declares; discovery then
/// "loads" it like any other module. Entries are matched after lexical
/// cleanup, so `a/../b/index.js` and `b/index.js` address the same module.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<NormalizedPath, ModuleExports>,
    es_imports: AtomicUsize,
    legacy_requires: AtomicUsize,
}

impl ModuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the exports of the module whose entry file is `entry`.
    pub fn register(&mut self, entry: impl AsRef<Path>, exports: ModuleExports) {
        self.modules.insert(key(entry.as_ref()), exports);
    }

    /// Builder form of [`ModuleRegistry::register`].
    pub fn with_module(mut self, entry: impl AsRef<Path>, exports: ModuleExports) -> Self {
        self.register(entry, exports);
        self
    }

    /// Number of loads served through the ES-module strategy.
    pub fn es_imports(&self) -> usize {
        self.es_imports.load(Ordering::Relaxed)
    }

    /// Number of loads served through the legacy strategy.
    pub fn legacy_requires(&self) -> usize {
        self.legacy_requires.load(Ordering::Relaxed)
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, path: &Path) -> Result<Box<dyn LoadedModule>> {
        self.modules
            .get(&key(path))
            .cloned()
            .map(|exports| Box::new(exports) as Box<dyn LoadedModule>)
            .ok_or_else(|| Error::ModuleNotFound(PathBuf::from(path)))
    }
}

fn key(path: &Path) -> NormalizedPath {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    NormalizedPath::new(absolute).resolve_dots()
}

#[async_trait]
impl ModuleLoader for ModuleRegistry {
    async fn import_es_module(&self, url: &Url) -> Result<Box<dyn LoadedModule>> {
        let path = url
            .to_file_path()
            .map_err(|()| Error::InvalidEntryUrl(url.to_string()))?;
        self.es_imports.fetch_add(1, Ordering::Relaxed);
        self.lookup(&path)
    }

    async fn require_legacy(&self, path: &Path) -> Result<Box<dyn LoadedModule>> {
        self.legacy_requires.fetch_add(1, Ordering::Relaxed);
        self.lookup(path)
    }
}
