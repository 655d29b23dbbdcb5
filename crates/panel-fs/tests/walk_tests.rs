//! Tests for the package-tree walkers against real temporary directories.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use panel_fs::{DirScan, PackageTreeWalker};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn package(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("package.json"), "{}").unwrap();
}

fn collect(iter: impl Iterator<Item = PathBuf>) -> BTreeSet<PathBuf> {
    iter.collect()
}

#[test]
fn walker_yields_packages_and_scoped_packages() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("node_modules");
    package(&root.join("plain"));
    package(&root.join("@scope").join("scoped"));
    fs::create_dir_all(root.join("no-manifest")).unwrap();
    fs::write(root.join("stray-file.txt"), "x").unwrap();

    let found = collect(PackageTreeWalker::new(&root));

    let expected: BTreeSet<PathBuf> = [root.join("plain"), root.join("@scope").join("scoped")]
        .into_iter()
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn walker_skips_hidden_entries() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("node_modules");
    package(&root.join(".pnpm"));
    package(&root.join(".bin"));
    package(&root.join("visible"));

    let found = collect(PackageTreeWalker::new(&root));
    assert_eq!(found, [root.join("visible")].into_iter().collect());
}

#[test]
fn walker_on_missing_root_is_empty() {
    let dir = tempdir().unwrap();
    assert_eq!(PackageTreeWalker::new(dir.path().join("absent")).count(), 0);
}

#[test]
fn walker_is_restartable_by_reconstruction() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("node_modules");
    package(&root.join("a"));

    assert_eq!(PackageTreeWalker::new(&root).count(), 1);
    package(&root.join("b"));
    assert_eq!(PackageTreeWalker::new(&root).count(), 2);
}

#[test]
fn dir_scan_is_single_level() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("dev-extensions");
    package(&root.join("ext-a"));
    package(&root.join(".hidden-ext"));
    package(&root.join("@scope").join("nested"));

    let found = collect(DirScan::new(&root));

    let expected: BTreeSet<PathBuf> = [root.join("ext-a"), root.join(".hidden-ext")]
        .into_iter()
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn dir_scan_on_missing_dir_is_empty() {
    let dir = tempdir().unwrap();
    assert_eq!(DirScan::new(dir.path().join("absent")).count(), 0);
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::symlink;

    #[test]
    fn walker_follows_symlinked_packages() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store").join("linked-pkg");
        package(&store);

        let root = dir.path().join("node_modules");
        fs::create_dir_all(&root).unwrap();
        symlink(&store, root.join("linked-pkg")).unwrap();
        symlink(dir.path().join("gone"), root.join("dangling")).unwrap();

        let found = collect(PackageTreeWalker::new(&root));
        assert_eq!(found, [root.join("linked-pkg")].into_iter().collect());
    }

    #[test]
    fn dir_scan_follows_symlinked_packages() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("checkout");
        package(&store);

        let root = dir.path().join("dev");
        fs::create_dir_all(&root).unwrap();
        symlink(&store, root.join("ext")).unwrap();

        let found = collect(DirScan::new(&root));
        assert_eq!(found, [root.join("ext")].into_iter().collect());
    }
}
