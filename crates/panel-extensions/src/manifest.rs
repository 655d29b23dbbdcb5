//! Package manifest parsing for `package.json` files.
//!
//! Only a handful of top-level fields matter to discovery. The extension
//! declarations live under the vendor key:
//!
//! ```json
//! {
//!   "name": "@fastybird/smart-panel-module-acme",
//!   "type": "module",
//!   "module": "dist/index.mjs",
//!   "fastybird": {
//!     "smartPanelBackend": {
//!       "kind": "module",
//!       "routePrefix": "devices/acme",
//!       "extensionExport": "AcmeModule"
//!     },
//!     "smartPanelAdmin": {
//!       "kind": "module",
//!       "extensionEntry": "admin/index.js"
//!     }
//!   }
//! }
//! ```
//!
//! Parsing is deliberately lenient: a wrongly typed optional field reads as
//! absent, and a declaration that fails validation is dropped rather than
//! reported.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Vendor namespace key holding the extension declarations.
pub const VENDOR_KEY: &str = "fastybird";

/// Field under [`VENDOR_KEY`] declaring a backend extension.
pub const BACKEND_FIELD: &str = "smartPanelBackend";

/// Field under [`VENDOR_KEY`] declaring an admin extension.
pub const ADMIN_FIELD: &str = "smartPanelAdmin";

/// Package-name prefixes accepted when the caller supplies none.
pub const DEFAULT_NAME_PREFIXES: [&str; 6] = [
    "@fastybird/smart-panel-module-",
    "fastybird-smart-panel-module-",
    "@fastybird/smart-panel-plugin-",
    "fastybird-smart-panel-plugin-",
    "@fastybird/smart-panel-extension-",
    "fastybird-smart-panel-extension-",
];

/// Whether `name` starts with any of `prefixes`.
pub fn matches_name_prefix<S: AsRef<str>>(name: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_ref()))
}

/// Strip leading/trailing slashes and collapse repeated internal ones.
///
/// `/devices//acme/` becomes `devices/acme`.
pub fn normalize_route_prefix(raw: &str) -> String {
    raw.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Extension kind shared by backend and admin declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Module,
    Plugin,
}

impl ExtensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Plugin => "plugin",
        }
    }
}

impl std::fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of `package.json` that discovery reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    /// Module-system marker; `"module"` means ES modules.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub module_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub module: Option<String>,
    #[serde(default)]
    pub exports: Option<Value>,
    #[serde(rename = "fastybird", default)]
    pub vendor: Option<Value>,
}

impl PackageManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read the manifest of the package at `package_dir`.
    ///
    /// Returns `None` if the file is missing, unreadable, or not a JSON object.
    pub fn from_dir(package_dir: &Path) -> Option<Self> {
        panel_fs::io::read_json_safe(&package_dir.join(panel_fs::PackagePath::Manifest))
    }

    /// Whether the package declares itself as using ES modules.
    pub fn is_es_module_package(&self) -> bool {
        self.module_type.as_deref() == Some("module")
    }

    /// The relative entry path: `module`, then `main`, then a string `exports`.
    pub fn entry_field(&self) -> Option<&str> {
        self.module
            .as_deref()
            .or(self.main.as_deref())
            .or_else(|| self.exports.as_ref().and_then(Value::as_str))
    }

    /// The package name, if non-empty and matching one of `prefixes`.
    pub fn extension_name<S: AsRef<str>>(&self, prefixes: &[S]) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty() && matches_name_prefix(name, prefixes))
    }

    /// Extract and validate both extension declarations.
    pub fn declarations(&self) -> ExtensionDeclarations {
        let field = |key: &str| self.vendor.as_ref().and_then(|v| v.get(key));
        ExtensionDeclarations {
            backend: field(BACKEND_FIELD).and_then(BackendExtensionManifest::from_value),
            admin: field(ADMIN_FIELD).and_then(AdminExtensionManifest::from_value),
        }
    }
}

/// Validated backend extension declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendExtensionManifest {
    pub kind: ExtensionKind,
    pub route_prefix: String,
    /// Name of the export holding the extension constructor.
    pub extension_export: String,
    /// Advisory SDK version string; never enforced.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BackendExtensionManifest {
    /// Validate a raw declaration; any other shape reads as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let manifest = Self::deserialize(value).ok()?;
        (!manifest.route_prefix.is_empty() && !manifest.extension_export.is_empty())
            .then_some(manifest)
    }

    /// The route prefix with slashes normalized.
    pub fn normalized_route_prefix(&self) -> String {
        normalize_route_prefix(&self.route_prefix)
    }

    /// The advisory SDK version parsed as a requirement, if it parses.
    pub fn sdk_version_req(&self) -> Option<semver::VersionReq> {
        parse_sdk_version(self.sdk_version.as_deref())
    }
}

/// Validated admin extension declaration. No code is loaded for these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminExtensionManifest {
    pub kind: ExtensionKind,
    /// Import specifier for the admin bundle; defaults to the package name.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    /// Export name; the bundle's default export when absent.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub extension_export: Option<String>,
    /// Package-relative file loaded by the admin at runtime.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub extension_entry: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AdminExtensionManifest {
    /// Validate a raw declaration; only `kind` is required.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    /// The advisory SDK version parsed as a requirement, if it parses.
    pub fn sdk_version_req(&self) -> Option<semver::VersionReq> {
        parse_sdk_version(self.sdk_version.as_deref())
    }
}

fn parse_sdk_version(raw: Option<&str>) -> Option<semver::VersionReq> {
    semver::VersionReq::parse(raw?).ok()
}

/// The validated declarations of one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionDeclarations {
    pub backend: Option<BackendExtensionManifest>,
    pub admin: Option<AdminExtensionManifest>,
}

impl ExtensionDeclarations {
    pub fn is_empty(&self) -> bool {
        self.backend.is_none() && self.admin.is_none()
    }
}
