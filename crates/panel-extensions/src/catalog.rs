//! Presentation-level view of a discovery result.
//!
//! Adds what a listing needs on top of the raw result: the installed
//! version, whether the extension shipped with the panel (bundled) or was
//! installed later (runtime), and where its admin bundle can be fetched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveredExtensions;
use crate::error::Result;
use crate::manifest::ExtensionKind;

/// File in the config directory listing the bundled extensions.
pub const BUNDLED_MANIFEST_FILENAME: &str = "extensions.manifest.json";

/// Environment variable naming the panel's config directory.
pub const CONFIG_PATH_ENV: &str = "FB_CONFIG_PATH";

/// Bytes a URI component leaves as-is: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which side of the panel an extension plugs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionSurface {
    Admin,
    Backend,
}

impl ExtensionSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Backend => "backend",
        }
    }
}

impl std::fmt::Display for ExtensionSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionSurface {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "backend" => Ok(Self::Backend),
            other => Err(format!("unknown extension surface: {other}")),
        }
    }
}

/// Whether an extension shipped with the panel or was installed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionSource {
    Bundled,
    Runtime,
}

impl std::fmt::Display for ExtensionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bundled => "bundled",
            Self::Runtime => "runtime",
        })
    }
}

#[derive(Debug, Deserialize)]
struct BundledManifest {
    #[serde(default)]
    bundled: Vec<BundledEntry>,
}

#[derive(Debug, Deserialize)]
struct BundledEntry {
    name: String,
}

/// Names of the extensions that shipped with the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundledSet {
    names: HashSet<String>,
}

impl BundledSet {
    /// Read [`BUNDLED_MANIFEST_FILENAME`] from `config_dir`.
    ///
    /// A missing or malformed file yields an empty set.
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join(BUNDLED_MANIFEST_FILENAME);
        match panel_fs::io::read_json_safe::<BundledManifest>(&path) {
            Some(manifest) => Self::from_names(manifest.bundled.into_iter().map(|e| e.name)),
            None => Self::default(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn source_of(&self, name: &str) -> ExtensionSource {
        if self.contains(name) {
            ExtensionSource::Bundled
        } else {
            ExtensionSource::Runtime
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Deserialize)]
struct VersionOnly {
    #[serde(default)]
    version: Option<serde_json::Value>,
}

/// The `version` of the package at `dir`, if its manifest has a string one.
pub fn read_package_version(dir: &Path) -> Option<String> {
    let pkg: VersionOnly =
        panel_fs::io::read_json_safe(&dir.join(panel_fs::PackagePath::Manifest))?;
    match pkg.version? {
        serde_json::Value::String(version) => Some(version),
        _ => None,
    }
}

/// One row of an extension listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSummary {
    pub name: String,
    pub kind: ExtensionKind,
    pub surface: ExtensionSurface,
    /// Declared display name, else the package name.
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub source: ExtensionSource,
    /// Backend rows only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_prefix: Option<String>,
    /// Admin rows only: `assets/<encoded package>/<entry>`, relative to the
    /// discovered-extensions endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

fn asset_path(package_name: &str, entry: &str) -> String {
    let encoded = utf8_percent_encode(package_name, URI_COMPONENT);
    format!("assets/{encoded}/{entry}")
}

/// A discovery result together with the bundled set.
#[derive(Debug, Clone)]
pub struct ExtensionCatalog<'a> {
    discovered: &'a DiscoveredExtensions,
    bundled: BundledSet,
}

impl<'a> ExtensionCatalog<'a> {
    pub fn new(discovered: &'a DiscoveredExtensions, bundled: BundledSet) -> Self {
        Self {
            discovered,
            bundled,
        }
    }

    /// Summaries for `surface`, or for both surfaces when `None`.
    ///
    /// Admin extensions without a runtime entry are not listed. Admin rows
    /// come first.
    pub fn summarize(&self, surface: Option<ExtensionSurface>) -> Vec<ExtensionSummary> {
        self.rows(surface, |_| true)
    }

    /// Summaries for the package called `name`, across both surfaces.
    pub fn find(&self, name: &str) -> Vec<ExtensionSummary> {
        self.rows(None, |pkg| pkg == name)
    }

    /// Resolve a request for `suffix` inside the admin bundle of `package_name`.
    ///
    /// `Ok(None)` if the package has no runtime admin entry or the file does
    /// not exist.
    pub fn resolve_asset(&self, package_name: &str, suffix: &str) -> Result<Option<PathBuf>> {
        let Some(ext) = self.discovered.runtime_admin(package_name) else {
            return Ok(None);
        };
        let path = ext.resolve_asset(suffix)?;
        Ok(path.is_file().then_some(path))
    }

    fn rows(
        &self,
        surface: Option<ExtensionSurface>,
        include: impl Fn(&str) -> bool,
    ) -> Vec<ExtensionSummary> {
        let mut out = Vec::new();

        if surface.is_none_or(|s| s == ExtensionSurface::Admin) {
            for admin in &self.discovered.admin {
                let Some(entry) = &admin.extension_entry else {
                    continue;
                };
                if !include(&admin.package_name) {
                    continue;
                }
                out.push(ExtensionSummary {
                    name: admin.package_name.clone(),
                    kind: admin.kind,
                    surface: ExtensionSurface::Admin,
                    display_name: admin
                        .display_name
                        .clone()
                        .unwrap_or_else(|| admin.package_name.clone()),
                    description: admin.description.clone(),
                    version: read_package_version(&admin.package_dir),
                    source: self.bundled.source_of(&admin.package_name),
                    route_prefix: None,
                    asset_path: Some(asset_path(&admin.package_name, entry)),
                });
            }
        }

        if surface.is_none_or(|s| s == ExtensionSurface::Backend) {
            for backend in &self.discovered.backend {
                if !include(&backend.package_name) {
                    continue;
                }
                out.push(ExtensionSummary {
                    name: backend.package_name.clone(),
                    kind: backend.kind,
                    surface: ExtensionSurface::Backend,
                    display_name: backend
                        .display_name
                        .clone()
                        .unwrap_or_else(|| backend.package_name.clone()),
                    description: backend.description.clone(),
                    version: read_package_version(&backend.package_dir),
                    source: self.bundled.source_of(&backend.package_name),
                    route_prefix: Some(backend.route_prefix.clone()),
                    asset_path: None,
                });
            }
        }

        out
    }
}
