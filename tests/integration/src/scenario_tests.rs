//! Scenario tests across the whole discovery stack
//!
//! Each test lays out a realistic checkout (a monorepo with a backend app,
//! a parent install tree, global packages, loose checkouts) and checks what
//! the backend would end up registering.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use panel_extensions::search_paths::parse_node_path;
use panel_extensions::{
    BundledSet, DiscoverOptions, DiscoveryCache, DiscoveryConfig, ExtensionCatalog, ExtensionClass,
    ExtensionDiscovery, ExtensionSource, ExtensionSurface, ModuleExports, ModuleRegistry, rank_dir,
};
use panel_test_utils::{PackageBuilder, TestWorkspace};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Default)]
struct AcmeModule;

#[derive(Default)]
struct LoggerPlugin;

fn acme(display_name: &str) -> PackageBuilder {
    PackageBuilder::new("@ns/smart-panel-module-acme")
        .version("1.0.0")
        .es_module()
        .module_entry("dist/index.js")
        .backend_raw(json!({
            "kind": "module",
            "routePrefix": "/devices/acme/",
            "extensionExport": "AcmeModule",
            "displayName": display_name,
        }))
}

fn ns_options() -> DiscoverOptions {
    DiscoverOptions {
        name_prefixes: Some(vec!["@ns/smart-panel-".to_string()]),
        ..DiscoverOptions::default()
    }
}

// =============================================================================
// Precedence
// =============================================================================

#[tokio::test]
async fn test_local_copy_shadows_parent_copy() {
    let ws = TestWorkspace::new();
    let local = ws.install("apps/backend/node_modules", &acme("Local"));
    let parent = ws.install("apps/node_modules", &acme("Parent"));
    let registry = Arc::new(
        ModuleRegistry::new()
            .with_module(
                local.join("dist/index.js"),
                ModuleExports::new().with_class(ExtensionClass::of::<AcmeModule>("AcmeModule")),
            )
            .with_module(
                parent.join("dist/index.js"),
                ModuleExports::new().with_class(ExtensionClass::of::<AcmeModule>("AcmeModule")),
            ),
    );

    let result = ExtensionDiscovery::new(registry.clone())
        .with_root(ws.path("apps/backend"))
        .with_global_dirs(Vec::new())
        .discover(&ns_options())
        .await
        .unwrap();

    assert_eq!(result.backend.len(), 1);
    let backend = &result.backend[0];
    assert_eq!(backend.display_name.as_deref(), Some("Local"));
    assert_eq!(backend.route_prefix, "devices/acme");
    assert_eq!(rank_dir(&backend.package_dir), 5);
    assert_eq!(registry.es_imports(), 2);
    assert_eq!(registry.legacy_requires(), 0);
}

#[tokio::test]
async fn test_global_copy_loses_to_application_copy() {
    let ws = TestWorkspace::new();
    let global = ws.install(
        "usr-global/node_modules",
        &PackageBuilder::new("@ns/smart-panel-plugin-logger")
            .admin_raw(json!({ "kind": "plugin", "extensionEntry": "admin.js", "displayName": "Global" })),
    );
    let app = ws.install(
        "apps/admin/node_modules",
        &PackageBuilder::new("@ns/smart-panel-plugin-logger")
            .admin_raw(json!({ "kind": "plugin", "extensionEntry": "admin.js", "displayName": "App" })),
    );

    // Global packages are walked first here, then the app tree as an extra dir.
    let node_path: OsString =
        std::env::join_paths([ws.path("usr-global/node_modules")]).unwrap();
    let options = DiscoverOptions {
        extra_dirs: vec![ws.path("apps/admin/node_modules")],
        ..ns_options()
    };
    let result = ExtensionDiscovery::new(Arc::new(ModuleRegistry::new()))
        .with_root(ws.path("srv"))
        .with_global_dirs(parse_node_path(&node_path))
        .discover(&options)
        .await
        .unwrap();

    assert_eq!(result.admin.len(), 1);
    assert_eq!(result.admin[0].display_name.as_deref(), Some("App"));
    assert_eq!(result.admin[0].package_dir, app);
    assert!(global.exists());
}

// =============================================================================
// Mixed workspace
// =============================================================================

#[tokio::test]
async fn test_mixed_workspace_catalog() {
    let ws = TestWorkspace::new();
    let acme_dir = ws.install("apps/backend/node_modules", &acme("Acme"));
    let logger_dir = ws.install_at(
        "extensions/logger",
        &PackageBuilder::new("@ns/smart-panel-plugin-logger")
            .version("0.4.0")
            .main_entry("index.cjs")
            .backend("plugin", "logger", "LoggerPlugin")
            .admin("plugin", Some("admin/index.js"))
            .file("admin/index.js", "export default {};\n"),
    );
    ws.install(
        "apps/backend/node_modules",
        &PackageBuilder::new("@ns/smart-panel-plugin-static").admin("plugin", None),
    );
    ws.install(
        "apps/backend/node_modules",
        &PackageBuilder::new("left-pad").main_entry("index.js"),
    );

    let registry = ModuleRegistry::new()
        .with_module(
            acme_dir.join("dist/index.js"),
            ModuleExports::new().with_class(ExtensionClass::of::<AcmeModule>("AcmeModule")),
        )
        .with_module(
            logger_dir.join("index.cjs"),
            ModuleExports::new().with_class(ExtensionClass::of::<LoggerPlugin>("LoggerPlugin")),
        );
    let options = DiscoverOptions {
        extra_dirs: vec![ws.path("extensions")],
        ..ns_options()
    };
    let discovery = ExtensionDiscovery::new(Arc::new(registry))
        .with_root(ws.path("apps/backend"))
        .with_global_dirs(Vec::new());
    let cache = DiscoveryCache::new(discovery, options);

    let discovered = cache.get().await.unwrap();
    assert_eq!(discovered.backend.len(), 2);
    assert_eq!(discovered.admin.len(), 2);

    let catalog = ExtensionCatalog::new(
        &discovered,
        BundledSet::from_names(["@ns/smart-panel-module-acme"]),
    );

    let all = catalog.summarize(None);
    assert_eq!(all.len(), 3);

    let admin = catalog.summarize(Some(ExtensionSurface::Admin));
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].name, "@ns/smart-panel-plugin-logger");
    assert_eq!(admin[0].version.as_deref(), Some("0.4.0"));
    assert_eq!(admin[0].source, ExtensionSource::Runtime);

    let acme_rows = catalog.find("@ns/smart-panel-module-acme");
    assert_eq!(acme_rows.len(), 1);
    assert_eq!(acme_rows[0].source, ExtensionSource::Bundled);
    assert_eq!(acme_rows[0].route_prefix.as_deref(), Some("devices/acme"));

    let asset = catalog
        .resolve_asset("@ns/smart-panel-plugin-logger", "admin/index.js")
        .unwrap()
        .unwrap();
    assert_eq!(asset, logger_dir.join("admin").join("index.js"));

    let logger = discovered
        .backend_by_package("@ns/smart-panel-plugin-logger")
        .next()
        .unwrap();
    assert!(logger.extension_class.construct().is::<LoggerPlugin>());
}

#[tokio::test]
async fn test_serialized_result_shape() {
    let ws = TestWorkspace::new();
    let dir = ws.install("apps/backend/node_modules", &acme("Acme").admin("module", None));
    let registry = ModuleRegistry::new().with_module(
        dir.join("dist/index.js"),
        ModuleExports::new().with_class(ExtensionClass::of::<AcmeModule>("AcmeModule")),
    );

    let result = ExtensionDiscovery::new(Arc::new(registry))
        .with_root(ws.path("apps/backend"))
        .with_global_dirs(Vec::new())
        .discover(&ns_options())
        .await
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["backend"][0]["packageName"], "@ns/smart-panel-module-acme");
    assert_eq!(value["backend"][0]["routePrefix"], "devices/acme");
    assert_eq!(value["backend"][0]["kind"], "module");
    assert!(value["backend"][0].get("extensionClass").is_none());
    assert_eq!(value["admin"][0]["importPath"], "@ns/smart-panel-module-acme");
    assert!(value["admin"][0].get("extensionEntry").is_none());
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn test_config_file_drives_discovery() {
    let ws = TestWorkspace::new();
    ws.install_at(
        "opt/extensions/acme",
        &PackageBuilder::new("@acme/panel-ext-weather").admin("plugin", Some("admin.js")),
    );
    ws.install_at(
        "opt/extensions/other",
        &PackageBuilder::new("@fastybird/smart-panel-plugin-other").admin("plugin", None),
    );
    let data = ws.dir("var/data");
    std::fs::write(
        data.join("extensions.manifest.json"),
        r#"{"bundled":[{"name":"@acme/panel-ext-weather"}]}"#,
    )
    .unwrap();
    let config_path = ws.path("panel.toml");
    std::fs::write(
        &config_path,
        r#"
[discovery]
extra_dirs = ["opt/extensions"]
name_prefixes = ["@acme/panel-ext-"]
config_dir = "var/data"
"#,
    )
    .unwrap();

    let config = DiscoveryConfig::from_path(&config_path).unwrap();
    let discovered = ExtensionDiscovery::new(Arc::new(ModuleRegistry::new()))
        .with_root(ws.path("apps/backend"))
        .with_global_dirs(Vec::new())
        .discover(&config.options())
        .await
        .unwrap();

    assert_eq!(discovered.admin.len(), 1);
    let config_dir: PathBuf = config.config_dir().unwrap();
    let catalog = ExtensionCatalog::new(&discovered, BundledSet::load(&config_dir));
    let rows = catalog.summarize(None);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, ExtensionSource::Bundled);
}

#[cfg(unix)]
#[tokio::test]
async fn test_workspace_linked_packages() {
    let ws = TestWorkspace::new();
    ws.install_at(
        "packages/acme",
        &PackageBuilder::new("@ns/smart-panel-module-acme").admin("module", Some("admin.js")),
    );
    let link = ws.symlink(
        "packages/acme",
        "apps/backend/node_modules/@ns/smart-panel-module-acme",
    );
    // A dangling link is not a package.
    std::os::unix::fs::symlink(
        ws.path("packages/gone"),
        ws.path("apps/backend/node_modules/@ns/smart-panel-module-gone"),
    )
    .unwrap();

    let result = ExtensionDiscovery::new(Arc::new(ModuleRegistry::new()))
        .with_root(ws.path("apps/backend"))
        .with_global_dirs(Vec::new())
        .discover(&ns_options())
        .await
        .unwrap();

    assert_eq!(result.admin.len(), 1);
    assert_eq!(result.admin[0].package_dir, link);
    assert!(
        panel_fs::NormalizedPath::new(&link).is_within(&panel_fs::NormalizedPath::new(
            ws.path("apps/backend/node_modules")
        ))
    );
}
