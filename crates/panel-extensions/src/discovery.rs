//! Extension discovery orchestration.
//!
//! One call to [`ExtensionDiscovery::discover`] walks every search root,
//! filters packages by name, validates their declarations, loads backend
//! entries and keeps the best-ranked candidate per extension key. Packages
//! are processed one at a time, in walk order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use panel_fs::{DirScan, NormalizedPath, PackageTreeWalker};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loader::{ExtensionClass, ModuleLoader, load_extension_class};
use crate::manifest::{
    AdminExtensionManifest, BackendExtensionManifest, DEFAULT_NAME_PREFIXES, ExtensionKind,
    PackageManifest,
};
use crate::rank::{Offer, RankedTable};
use crate::search_paths::{self, absolutize, candidate_roots};

/// Caller-supplied discovery options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoverOptions {
    /// Additional directories; walked as install trees and also scanned one
    /// level deep for plain package checkouts.
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
    /// Replaces [`DEFAULT_NAME_PREFIXES`] when set.
    #[serde(default)]
    pub name_prefixes: Option<Vec<String>>,
}

impl DiscoverOptions {
    /// The effective package-name prefixes.
    pub fn prefixes(&self) -> Vec<String> {
        match &self.name_prefixes {
            Some(prefixes) => prefixes.clone(),
            None => DEFAULT_NAME_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A backend extension whose entry module loaded and exported a class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredBackendExtension {
    pub package_name: String,
    /// Normalized route prefix (no leading, trailing or doubled slashes).
    pub route_prefix: String,
    #[serde(skip)]
    pub extension_class: ExtensionClass,
    pub kind: ExtensionKind,
    pub package_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
}

/// An admin extension; metadata only, nothing is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredAdminExtension {
    pub package_name: String,
    pub import_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_export: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_entry: Option<String>,
    pub kind: ExtensionKind,
    pub package_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
}

impl DiscoveredAdminExtension {
    /// Resolve a package-relative asset path for serving.
    ///
    /// Leading slashes are ignored. The result must stay inside the package
    /// directory; the file itself is not checked.
    pub fn resolve_asset(&self, suffix: &str) -> Result<PathBuf> {
        let suffix = suffix.trim_start_matches(['/', '\\']);
        if suffix.is_empty() {
            return Err(Error::EmptyAssetPath);
        }

        let base = NormalizedPath::new(&self.package_dir).resolve_dots();
        let resolved = base.join(suffix).resolve_dots();
        if !resolved.is_within(&base) {
            return Err(Error::PathTraversal(suffix.to_string()));
        }

        Ok(resolved.to_native())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BackendKey {
    package_name: String,
    kind: ExtensionKind,
    route_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AdminKey {
    package_name: String,
    kind: ExtensionKind,
    import_path: String,
    // Absent and empty entries share a key.
    entry: String,
}

/// The result of one discovery run. Element order is not meaningful.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveredExtensions {
    pub backend: Vec<DiscoveredBackendExtension>,
    pub admin: Vec<DiscoveredAdminExtension>,
}

impl DiscoveredExtensions {
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty() && self.admin.is_empty()
    }

    /// Backend extensions provided by `package_name`.
    pub fn backend_by_package<'a>(
        &'a self,
        package_name: &str,
    ) -> impl Iterator<Item = &'a DiscoveredBackendExtension> {
        self.backend
            .iter()
            .filter(move |b| b.package_name == package_name)
    }

    /// Admin extensions provided by `package_name`.
    pub fn admin_by_package<'a>(
        &'a self,
        package_name: &str,
    ) -> impl Iterator<Item = &'a DiscoveredAdminExtension> {
        self.admin
            .iter()
            .filter(move |a| a.package_name == package_name)
    }

    /// The first admin extension of `package_name` that has a runtime entry.
    pub fn runtime_admin(&self, package_name: &str) -> Option<&DiscoveredAdminExtension> {
        self.admin_by_package(package_name)
            .find(|a| a.extension_entry.is_some())
    }
}

/// Discovery engine bound to a loader and an application root.
pub struct ExtensionDiscovery {
    loader: Arc<dyn ModuleLoader>,
    root: Option<PathBuf>,
    global_dirs: Option<Vec<PathBuf>>,
}

impl std::fmt::Debug for ExtensionDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionDiscovery")
            .field("root", &self.root)
            .field("global_dirs", &self.global_dirs)
            .finish_non_exhaustive()
    }
}

impl ExtensionDiscovery {
    /// Discovery rooted at the process working directory, with global
    /// paths taken from the environment.
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            root: None,
            global_dirs: None,
        }
    }

    /// Use `root` as the application package root instead of the working directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Use a fixed set of global module paths instead of the environment.
    pub fn with_global_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.global_dirs = Some(dirs);
        self
    }

    /// The application root this discovery uses.
    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => std::path::absolute(root).map_err(|source| Error::InvalidRoot {
                path: root.clone(),
                source,
            }),
            None => std::env::current_dir().map_err(Error::WorkingDirectory),
        }
    }

    /// Ordered, deduplicated install-tree roots that will be walked.
    pub fn search_roots(&self, options: &DiscoverOptions) -> Result<Vec<PathBuf>> {
        let root = self.root()?;
        let global = match &self.global_dirs {
            Some(dirs) => dirs.clone(),
            None => search_paths::global_search_paths(),
        };
        Ok(candidate_roots(&root, &global, &options.extra_dirs))
    }

    /// Every candidate package directory, each listed once, in walk order.
    pub fn candidate_packages(&self, options: &DiscoverOptions) -> Result<Vec<PathBuf>> {
        let roots = self.search_roots(options)?;
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for root in &roots {
            tracing::debug!(root = %root.display(), "walking install tree");
            packages.extend(PackageTreeWalker::new(root).filter(|dir| seen.insert(dir.clone())));
        }

        for dir in &options.extra_dirs {
            let dir = absolutize(dir);
            packages.extend(DirScan::new(&dir).filter(|pkg| seen.insert(pkg.clone())));
        }

        Ok(packages)
    }

    /// Run one discovery pass.
    ///
    /// Fails only if the application root cannot be determined or made
    /// absolute (an empty root, for one). Malformed, unmatched, or
    /// unloadable packages are left out of the result.
    pub async fn discover(&self, options: &DiscoverOptions) -> Result<DiscoveredExtensions> {
        let prefixes = options.prefixes();
        let mut backend_by_key: RankedTable<BackendKey, DiscoveredBackendExtension> =
            RankedTable::new();
        let mut admin_by_key: RankedTable<AdminKey, DiscoveredAdminExtension> = RankedTable::new();

        for package_dir in self.candidate_packages(options)? {
            tracing::trace!(dir = %package_dir.display(), "inspecting package");

            let Some(pkg) = PackageManifest::from_dir(&package_dir) else {
                continue;
            };
            let Some(name) = pkg.extension_name(&prefixes) else {
                continue;
            };
            let declarations = pkg.declarations();
            if declarations.is_empty() {
                continue;
            }

            if let Some(manifest) = &declarations.backend {
                if let Some(class) = self.load_backend(&pkg, manifest, &package_dir).await {
                    let item = backend_extension(name, manifest, class, &package_dir);
                    let key = BackendKey {
                        package_name: item.package_name.clone(),
                        kind: item.kind,
                        route_prefix: item.route_prefix.clone(),
                    };
                    if backend_by_key.offer(key, &package_dir, item) == Offer::Replaced {
                        tracing::debug!(package = name, dir = %package_dir.display(), "backend extension outranked earlier copy");
                    }
                }
            }

            if let Some(manifest) = declarations.admin {
                let item = admin_extension(name, manifest, &package_dir);
                let key = AdminKey {
                    package_name: item.package_name.clone(),
                    kind: item.kind,
                    import_path: item.import_path.clone(),
                    entry: item.extension_entry.clone().unwrap_or_default(),
                };
                if admin_by_key.offer(key, &package_dir, item) == Offer::Replaced {
                    tracing::debug!(package = name, dir = %package_dir.display(), "admin extension outranked earlier copy");
                }
            }
        }

        let discovered = DiscoveredExtensions {
            backend: backend_by_key.into_values(),
            admin: admin_by_key.into_values(),
        };
        tracing::debug!(
            backend = discovered.backend.len(),
            admin = discovered.admin.len(),
            "extension discovery finished"
        );
        Ok(discovered)
    }

    /// Resolve, load and project the backend export; `None` drops the candidate.
    async fn load_backend(
        &self,
        pkg: &PackageManifest,
        manifest: &BackendExtensionManifest,
        package_dir: &Path,
    ) -> Option<ExtensionClass> {
        let Some(entry) = pkg.entry_field() else {
            tracing::debug!(dir = %package_dir.display(), "backend extension declares no entry");
            return None;
        };
        let entry_path = package_dir.join(entry);

        match load_extension_class(self.loader.as_ref(), pkg, manifest, &entry_path).await {
            Ok(Some(class)) => Some(class),
            Ok(None) => {
                tracing::debug!(
                    entry = %entry_path.display(),
                    export = %manifest.extension_export,
                    "export missing or not constructible"
                );
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping backend extension");
                None
            }
        }
    }
}

fn backend_extension(
    name: &str,
    manifest: &BackendExtensionManifest,
    extension_class: ExtensionClass,
    package_dir: &Path,
) -> DiscoveredBackendExtension {
    if manifest.sdk_version.is_some() && manifest.sdk_version_req().is_none() {
        tracing::debug!(package = name, sdk_version = ?manifest.sdk_version, "sdk version is not a semver requirement");
    }
    DiscoveredBackendExtension {
        package_name: name.to_string(),
        route_prefix: manifest.normalized_route_prefix(),
        extension_class,
        kind: manifest.kind,
        package_dir: package_dir.to_path_buf(),
        display_name: manifest.display_name.clone(),
        description: manifest.description.clone(),
        sdk_version: manifest.sdk_version.clone(),
    }
}

fn admin_extension(
    name: &str,
    manifest: AdminExtensionManifest,
    package_dir: &Path,
) -> DiscoveredAdminExtension {
    if manifest.sdk_version.is_some() && manifest.sdk_version_req().is_none() {
        tracing::debug!(package = name, sdk_version = ?manifest.sdk_version, "sdk version is not a semver requirement");
    }
    DiscoveredAdminExtension {
        package_name: name.to_string(),
        import_path: manifest.import_path.unwrap_or_else(|| name.to_string()),
        extension_export: manifest.extension_export,
        extension_entry: manifest.extension_entry,
        kind: manifest.kind,
        package_dir: package_dir.to_path_buf(),
        display_name: manifest.display_name,
        description: manifest.description,
        sdk_version: manifest.sdk_version,
    }
}

/// Run one discovery pass from the working directory with the environment's
/// global paths.
pub async fn discover_extensions(
    loader: Arc<dyn ModuleLoader>,
    options: &DiscoverOptions,
) -> Result<DiscoveredExtensions> {
    ExtensionDiscovery::new(loader).discover(options).await
}
