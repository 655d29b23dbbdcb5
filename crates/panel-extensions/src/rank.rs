//! Location-based precedence for duplicate extensions.
//!
//! Ranks, highest first:
//!
//! | rank | location                                                   |
//! |------|------------------------------------------------------------|
//! | 5    | inside `apps/backend/node_modules/` (the backend's own tree)|
//! | 4    | under an `apps/` directory and a `node_modules/` directory  |
//! | 3    | under `node_modules/` reached through a `..` segment        |
//! | 2    | under `/usr…`, or an `npm/node_modules` global tree          |
//! | 1    | anywhere else                                              |
//!
//! Matching is textual on the unresolved path, so `..` segments count.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use panel_fs::{NormalizedPath, PackagePath};

/// Precedence rank of a package directory; higher wins.
pub fn rank_dir(dir: &Path) -> u8 {
    let path = NormalizedPath::new(dir);
    let install = PackagePath::InstallDir.as_str();
    let in_install_tree = path.contains_segments(&[install]);

    if path.contains_segments(&[
        PackagePath::AppsDir.as_str(),
        PackagePath::BackendApp.as_str(),
        install,
    ]) {
        return 5;
    }

    if path.contains_segments(&[PackagePath::AppsDir.as_str()]) && in_install_tree {
        return 4;
    }

    if in_install_tree && path.contains_segments(&[".."]) {
        return 3;
    }

    if path.starts_with_str("/usr")
        || path.contains_str(&format!("/{}/{}", PackagePath::NpmDir, install))
    {
        return 2;
    }

    1
}

/// The rank a package installed directly inside `root` would receive.
///
/// Install roots themselves rank lower than their contents, since the
/// location patterns only match with a package segment after them.
pub fn rank_root(root: &Path) -> u8 {
    rank_dir(&root.join("package"))
}

/// Outcome of [`RankedTable::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First candidate for the key.
    Inserted,
    /// Outranked and replaced the previous candidate.
    Replaced,
    /// Did not outrank the existing candidate; discarded.
    Kept,
}

#[derive(Debug)]
struct Ranked<V> {
    rank: u8,
    dir: PathBuf,
    item: V,
}

/// A key → candidate table where a later candidate replaces an earlier one
/// only if its directory ranks strictly higher.
///
/// Values come back in first-insertion order of their keys.
#[derive(Debug)]
pub struct RankedTable<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<Ranked<V>>,
}

impl<K, V> Default for RankedTable<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash, V> RankedTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `item`, found in `dir`, as the candidate for `key`.
    pub fn offer(&mut self, key: K, dir: &Path, item: V) -> Offer {
        let rank = rank_dir(dir);

        match self.index.get(&key) {
            Some(&slot) => {
                let existing = &mut self.entries[slot];
                if rank > existing.rank {
                    *existing = Ranked {
                        rank,
                        dir: dir.to_path_buf(),
                        item,
                    };
                    Offer::Replaced
                } else {
                    Offer::Kept
                }
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(Ranked {
                    rank,
                    dir: dir.to_path_buf(),
                    item,
                });
                Offer::Inserted
            }
        }
    }

    /// The current candidate for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].item)
    }

    /// The directory the current candidate for `key` came from.
    pub fn source_dir(&self, key: &K) -> Option<&Path> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].dir.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_values(self) -> Vec<V> {
        self.entries.into_iter().map(|ranked| ranked.item).collect()
    }
}
