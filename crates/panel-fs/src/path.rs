//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Repeated separators are collapsed (a leading `//` network prefix is kept),
/// but `.` and `..` segments are preserved as written. Precedence ranking
/// relies on seeing parent-traversal segments in the path text, so
/// resolving them is a separate, explicit step ([`NormalizedPath::resolve_dots`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        if segment.is_empty() || segment == "." {
            return self.clone();
        }
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Whether the path contains `segments` as consecutive components that are
    /// followed by at least one further component.
    ///
    /// `/repo/apps/backend/node_modules/pkg` contains `["apps", "backend",
    /// "node_modules"]`, while `/repo/apps/backend/node_modules` does not.
    pub fn contains_segments(&self, segments: &[&str]) -> bool {
        if segments.is_empty() {
            return false;
        }
        let needle = format!("/{}/", segments.join("/"));
        self.inner.contains(&needle)
    }

    /// Whether the path text begins with `prefix`.
    pub fn starts_with_str(&self, prefix: &str) -> bool {
        self.inner.starts_with(prefix)
    }

    /// Whether the path text contains `needle` anywhere.
    pub fn contains_str(&self, needle: &str) -> bool {
        self.inner.contains(needle)
    }

    /// Lexically resolve `.` and `..` segments.
    ///
    /// Does not touch the filesystem, so symlinks are not followed. A `..`
    /// that would climb above the root of an absolute path is dropped; on a
    /// relative path it is kept.
    pub fn resolve_dots(&self) -> Self {
        let absolute = self.inner.starts_with('/');
        let mut parts: Vec<&str> = Vec::new();

        for segment in self.inner.split('/') {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    _ if absolute => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }

        let body = parts.join("/");
        let inner = if has_network_prefix(&self.inner) {
            format!("//{}", body)
        } else if absolute {
            format!("/{}", body)
        } else {
            body
        };
        Self { inner }
    }

    /// Whether this path is `base` or lies underneath it, compared by
    /// whole components.
    pub fn is_within(&self, base: &NormalizedPath) -> bool {
        let base = base.inner.trim_end_matches('/');
        if base.is_empty() {
            return self.inner.starts_with('/');
        }
        self.inner == base
            || self
                .inner
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// A leading `//` (but not `///`) marks a `//server/share` path.
fn has_network_prefix(path: &str) -> bool {
    path.starts_with("//") && !path.starts_with("///")
}

/// Convert backslashes and collapse separator runs, keeping a leading `//`.
fn clean(raw: &str) -> String {
    let replaced = raw.replace('\\', "/");
    let (prefix, rest) = if has_network_prefix(&replaced) {
        ("//", &replaced[2..])
    } else {
        ("", replaced.as_str())
    };

    let mut out = String::with_capacity(replaced.len());
    out.push_str(prefix);
    let mut prev_slash = !prefix.is_empty();
    for c in rest.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
