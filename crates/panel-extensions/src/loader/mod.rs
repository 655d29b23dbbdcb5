//! Module loading behind one "load module, project export" operation.
//!
//! A [`ModuleLoader`] owns its module cache: discovery never unloads or
//! reloads anything, and loading the same entry twice is expected to be
//! idempotent from the loader's point of view.

mod native;
mod registry;

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::entry::EntryModule;
use crate::error::{Error, Result};
use crate::manifest::{BackendExtensionManifest, PackageManifest};

pub use native::{NativeConstructor, NativeInstance, NativeModuleLoader};
pub use registry::ModuleRegistry;

/// An object produced by constructing an extension class.
pub type ExtensionInstance = Box<dyn Any + Send>;

type Constructor = dyn Fn() -> ExtensionInstance + Send + Sync;

/// A named, constructible extension export.
///
/// Cloning is cheap and clones share the same constructor.
#[derive(Clone)]
pub struct ExtensionClass {
    name: Arc<str>,
    constructor: Arc<Constructor>,
}

impl ExtensionClass {
    pub fn new<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> ExtensionInstance + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            constructor: Arc::new(constructor),
        }
    }

    /// A class whose instances are `T::default()`.
    pub fn of<T: Default + Send + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, || Box::new(T::default()))
    }

    /// The export name this class was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn construct(&self) -> ExtensionInstance {
        (self.constructor)()
    }
}

impl std::fmt::Debug for ExtensionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionClass")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A value exported by a loaded module.
#[derive(Debug, Clone)]
pub enum Export {
    /// Something that can be constructed.
    Class(ExtensionClass),
    /// Plain data; never a valid extension export.
    Value(serde_json::Value),
}

impl Export {
    pub fn into_class(self) -> Option<ExtensionClass> {
        match self {
            Self::Class(class) => Some(class),
            Self::Value(_) => None,
        }
    }
}

/// A module after loading: a lookup from export name to value.
pub trait LoadedModule: Send + Sync {
    fn export(&self, name: &str) -> Option<Export>;
}

/// A plain in-memory export table.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    exports: HashMap<String, Export>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constructible export under `class.name()`.
    pub fn with_class(mut self, class: ExtensionClass) -> Self {
        self.exports
            .insert(class.name().to_string(), Export::Class(class));
        self
    }

    /// Add a non-constructible export.
    pub fn with_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.exports.insert(name.into(), Export::Value(value));
        self
    }
}

impl LoadedModule for ModuleExports {
    fn export(&self, name: &str) -> Option<Export> {
        self.exports.get(name).cloned()
    }
}

/// The two loading strategies.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Import an ES module. Always receives a `file://` URL.
    async fn import_es_module(&self, url: &Url) -> Result<Box<dyn LoadedModule>>;

    /// Load a legacy module by absolute filesystem path.
    async fn require_legacy(&self, path: &Path) -> Result<Box<dyn LoadedModule>>;
}

/// Load the backend entry at `entry_path` with the strategy its format needs.
///
/// Fails with [`Error::EntryNotFound`] if nothing exists at `entry_path`.
pub async fn load_backend_module(
    loader: &dyn ModuleLoader,
    manifest: &PackageManifest,
    entry_path: &Path,
) -> Result<Box<dyn LoadedModule>> {
    if !panel_fs::io::exists(entry_path) {
        return Err(Error::EntryNotFound {
            path: entry_path.to_path_buf(),
            package: manifest
                .name
                .clone()
                .unwrap_or_else(|| "<unknown>".to_string()),
        });
    }

    match EntryModule::for_file(manifest, entry_path)? {
        EntryModule::EsModule { url, .. } => loader.import_es_module(&url).await,
        EntryModule::Legacy { path } => loader.require_legacy(&path).await,
    }
}

/// Load the entry and project the declared export.
///
/// `Ok(None)` means the module loaded but the export is missing or not
/// constructible.
pub async fn load_extension_class(
    loader: &dyn ModuleLoader,
    manifest: &PackageManifest,
    backend: &BackendExtensionManifest,
    entry_path: &Path,
) -> Result<Option<ExtensionClass>> {
    let module = load_backend_module(loader, manifest, entry_path).await?;
    Ok(module
        .export(&backend.extension_export)
        .and_then(Export::into_class))
}
