//! [`PackageBuilder`] for extension package fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

/// Builds a package directory: a `package.json` plus any entry files.
///
/// # Example
///
/// ```rust,no_run
/// use panel_test_utils::PackageBuilder;
///
/// let pkg = PackageBuilder::new("@fastybird/smart-panel-module-acme")
///     .es_module()
///     .module_entry("dist/index.mjs")
///     .backend("module", "devices/acme", "AcmeModule");
/// pkg.write_to(std::path::Path::new("/tmp/acme"));
/// ```
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    name: Option<String>,
    manifest: Map<String, Value>,
    vendor: Map<String, Value>,
    files: Vec<(String, String)>,
}

impl PackageBuilder {
    /// A package called `name`.
    pub fn new(name: &str) -> Self {
        let mut builder = Self::unnamed();
        builder.name = Some(name.to_string());
        builder
            .manifest
            .insert("name".to_string(), Value::String(name.to_string()));
        builder
    }

    /// A package without a `name` field.
    pub fn unnamed() -> Self {
        Self {
            name: None,
            manifest: Map::new(),
            vendor: Map::new(),
            files: Vec::new(),
        }
    }

    /// The package name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set any top-level manifest field.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.manifest.insert(key.to_string(), value);
        self
    }

    pub fn version(self, version: &str) -> Self {
        self.field("version", json!(version))
    }

    /// Mark the package as ES modules (`"type": "module"`).
    pub fn es_module(self) -> Self {
        self.field("type", json!("module"))
    }

    /// Declare `rel` as the `module` entry and create the file.
    pub fn module_entry(self, rel: &str) -> Self {
        self.field("module", json!(rel)).file(rel, "export {};\n")
    }

    /// Declare `rel` as the `main` entry and create the file.
    pub fn main_entry(self, rel: &str) -> Self {
        self.field("main", json!(rel)).file(rel, "module.exports = {};\n")
    }

    /// Declare `rel` as the `main` entry without creating the file.
    pub fn unbuilt_main_entry(self, rel: &str) -> Self {
        self.field("main", json!(rel))
    }

    /// Add a backend declaration.
    pub fn backend(self, kind: &str, route_prefix: &str, export: &str) -> Self {
        self.backend_raw(json!({
            "kind": kind,
            "routePrefix": route_prefix,
            "extensionExport": export,
        }))
    }

    /// Add a backend declaration verbatim.
    pub fn backend_raw(mut self, value: Value) -> Self {
        self.vendor.insert("smartPanelBackend".to_string(), value);
        self
    }

    /// Add an admin declaration, optionally with a runtime entry file.
    pub fn admin(self, kind: &str, entry: Option<&str>) -> Self {
        let mut value = json!({ "kind": kind });
        if let Some(entry) = entry {
            value["extensionEntry"] = json!(entry);
        }
        self.admin_raw(value)
    }

    /// Add an admin declaration verbatim.
    pub fn admin_raw(mut self, value: Value) -> Self {
        self.vendor.insert("smartPanelAdmin".to_string(), value);
        self
    }

    /// Add an extra file, relative to the package directory.
    pub fn file(mut self, rel: &str, content: &str) -> Self {
        self.files.push((rel.to_string(), content.to_string()));
        self
    }

    /// The manifest as JSON.
    pub fn manifest(&self) -> Value {
        let mut manifest = self.manifest.clone();
        if !self.vendor.is_empty() {
            manifest.insert("fastybird".to_string(), Value::Object(self.vendor.clone()));
        }
        Value::Object(manifest)
    }

    /// Write the package into `dir`, creating it. Returns `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("package.json"),
            serde_json::to_string_pretty(&self.manifest()).unwrap(),
        )
        .unwrap();

        for (rel, content) in &self.files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        dir.to_path_buf()
    }
}
