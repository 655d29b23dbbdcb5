//! Extension discovery for the smart panel.
//!
//! Scans installed packages for manifests declaring a backend or admin
//! extension, loads backend entry modules through a [`ModuleLoader`], and
//! returns one deduplicated entry per extension, preferring copies found in
//! higher-precedence install trees.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod rank;
pub mod search_paths;

pub use cache::DiscoveryCache;
pub use catalog::{
    BundledSet, ExtensionCatalog, ExtensionSource, ExtensionSummary, ExtensionSurface,
    read_package_version,
};
pub use config::DiscoveryConfig;
pub use discovery::{
    DiscoverOptions, DiscoveredAdminExtension, DiscoveredBackendExtension, DiscoveredExtensions,
    ExtensionDiscovery, discover_extensions,
};
pub use entry::EntryModule;
pub use error::{Error, Result};
pub use loader::{
    Export, ExtensionClass, ExtensionInstance, LoadedModule, ModuleExports, ModuleLoader,
    ModuleRegistry, NativeModuleLoader, load_backend_module, load_extension_class,
};
pub use manifest::{
    AdminExtensionManifest, BackendExtensionManifest, DEFAULT_NAME_PREFIXES,
    ExtensionDeclarations, ExtensionKind, PackageManifest, normalize_route_prefix,
};
pub use rank::{Offer, RankedTable, rank_dir, rank_root};
