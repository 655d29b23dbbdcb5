//! Native extension loader for compiled shared libraries (.so/.dylib/.dll).
//!
//! The declared export names a symbol of type [`NativeConstructor`]. Any
//! symbol found under that name is treated as the constructor; a missing
//! symbol reads as a missing export.

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use libloading::Library;
use url::Url;

use super::{Export, ExtensionClass, LoadedModule, ModuleLoader};
use crate::error::{Error, Result};

/// Signature every native extension constructor must have.
pub type NativeConstructor = unsafe extern "C" fn() -> *mut c_void;

/// An object returned by a native constructor.
///
/// Keeps its library mapped for as long as the instance lives.
#[derive(Debug)]
pub struct NativeInstance {
    raw: *mut c_void,
    _library: Arc<Library>,
}

// SAFETY: the pointer is an opaque handle owned by the extension; the host
// only passes it back across the FFI boundary and never dereferences it.
unsafe impl Send for NativeInstance {}

impl NativeInstance {
    /// The opaque handle returned by the constructor.
    pub fn as_ptr(&self) -> *mut c_void {
        self.raw
    }
}

struct NativeModule {
    library: Arc<Library>,
}

impl LoadedModule for NativeModule {
    fn export(&self, name: &str) -> Option<Export> {
        // SAFETY: the symbol type is the documented extension ABI.
        let constructor: NativeConstructor =
            unsafe { *self.library.get::<NativeConstructor>(name.as_bytes()).ok()? };
        let library = Arc::clone(&self.library);

        Some(Export::Class(ExtensionClass::new(name, move || {
            // SAFETY: see `NativeConstructor`.
            let raw = unsafe { constructor() };
            Box::new(NativeInstance {
                raw,
                _library: Arc::clone(&library),
            })
        })))
    }
}

/// Loads shared libraries with `libloading` and keeps them mapped for the
/// rest of the process. A second load of the same path reuses the handle.
#[derive(Debug, Default)]
pub struct NativeModuleLoader {
    libraries: Mutex<HashMap<PathBuf, Arc<Library>>>,
}

impl NativeModuleLoader {
    /// Create a new native extension loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct libraries currently held.
    pub fn loaded(&self) -> usize {
        self.libraries.lock().map(|libs| libs.len()).unwrap_or(0)
    }

    fn cached(&self, path: &Path) -> Option<Arc<Library>> {
        self.libraries.lock().ok()?.get(path).cloned()
    }

    async fn open(&self, path: PathBuf) -> Result<Box<dyn LoadedModule>> {
        if let Some(library) = self.cached(&path) {
            return Ok(Box::new(NativeModule { library }));
        }

        let target = path.clone();
        // SAFETY: loading runs the library's initialisers; extensions are
        // trusted code installed alongside the host.
        let opened = tokio::task::spawn_blocking(move || unsafe { Library::new(&target) })
            .await
            .map_err(|e| Error::LoadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?
            .map_err(|e| Error::LoadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let library = match self.libraries.lock() {
            Ok(mut libs) => Arc::clone(libs.entry(path).or_insert_with(|| Arc::new(opened))),
            Err(_) => Arc::new(opened),
        };

        Ok(Box::new(NativeModule { library }))
    }
}

#[async_trait]
impl ModuleLoader for NativeModuleLoader {
    async fn import_es_module(&self, url: &Url) -> Result<Box<dyn LoadedModule>> {
        let path = url
            .to_file_path()
            .map_err(|()| Error::InvalidEntryUrl(url.to_string()))?;
        self.open(path).await
    }

    async fn require_legacy(&self, path: &Path) -> Result<Box<dyn LoadedModule>> {
        self.open(path.to_path_buf()).await
    }
}
