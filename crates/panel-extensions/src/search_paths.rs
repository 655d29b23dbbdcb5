//! Search-root computation.
//!
//! Roots are, in order: the application's own install directory, the parent
//! directory's install directory, the global module paths, and any extra
//! directories supplied by the caller. None of this fails: whatever cannot
//! be determined simply contributes nothing.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use panel_fs::{NormalizedPath, PackagePath};

/// Environment variable holding a path-list of extra module search roots.
/// When set, it fully replaces the default global locations.
pub const NODE_PATH_ENV: &str = "NODE_PATH";

/// Environment defaults for the global-prefix query; values already present
/// in the process environment win.
const NPM_QUIET_ENV: [(&str, &str); 2] = [
    ("npm_config_loglevel", "silent"),
    ("npm_update_notifier", "false"),
];

/// Global module paths from the environment, or the platform defaults.
///
/// An empty [`NODE_PATH_ENV`] counts as unset.
///
/// On non-Windows platforms without [`NODE_PATH_ENV`] this runs `npm prefix -g`.
/// The call is synchronous and has no timeout: a hanging `npm` blocks
/// discovery.
pub fn global_search_paths() -> Vec<PathBuf> {
    node_path_override(std::env::var_os(NODE_PATH_ENV)).unwrap_or_else(default_global_paths)
}

/// The roots named by a [`NODE_PATH_ENV`] value, or `None` if the value is
/// absent or empty and the defaults apply.
pub fn node_path_override(value: Option<OsString>) -> Option<Vec<PathBuf>> {
    value
        .filter(|value| !value.is_empty())
        .map(|value| parse_node_path(&value))
}

/// Split a path-list value, dropping empty segments.
pub fn parse_node_path(value: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

#[cfg(not(windows))]
fn default_global_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/usr/local/lib/node_modules"),
        PathBuf::from("/usr/lib/node_modules"),
    ];
    if let Some(prefix) = npm_global_prefix() {
        paths.push(prefix.join("lib").join(PackagePath::InstallDir));
    }
    paths
}

#[cfg(windows)]
fn default_global_paths() -> Vec<PathBuf> {
    std::env::var_os("APPDATA")
        .map(|appdata| {
            vec![
                PathBuf::from(appdata)
                    .join(PackagePath::NpmDir)
                    .join(PackagePath::InstallDir),
            ]
        })
        .unwrap_or_default()
}

/// Query the global package-manager prefix (`npm prefix -g`).
///
/// Returns `None` if npm is missing, exits non-zero, or prints nothing.
pub fn npm_global_prefix() -> Option<PathBuf> {
    let mut cmd = Command::new("npm");
    cmd.args(["prefix", "-g"]);
    for (key, value) in NPM_QUIET_ENV {
        if std::env::var_os(key).is_none() {
            cmd.env(key, value);
        }
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "could not query global npm prefix");
            return None;
        }
    };

    if !output.status.success() {
        tracing::warn!(status = ?output.status.code(), "global npm prefix query failed");
        return None;
    }

    let prefix = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!prefix.is_empty()).then(|| PathBuf::from(prefix))
}

/// Absolute form of `path`, resolved against the working directory
/// (lexically; `..` segments are kept).
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Ordered, deduplicated install-tree roots for an application at `root`.
///
/// The parent root is cleaned lexically, so `app/../node_modules` becomes
/// the sibling `node_modules` and ranks by where it actually sits.
pub fn candidate_roots(root: &Path, global: &[PathBuf], extra_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let parent = NormalizedPath::new(root.join("..").join(PackagePath::InstallDir))
        .resolve_dots()
        .to_native();
    let local = [root.join(PackagePath::InstallDir), parent];

    dedup(
        local
            .into_iter()
            .chain(global.iter().map(|p| absolutize(p)))
            .chain(extra_dirs.iter().map(|p| absolutize(p))),
    )
}

/// Keep the first occurrence of each path.
pub fn dedup(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
