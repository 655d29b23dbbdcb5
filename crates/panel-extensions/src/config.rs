//! Discovery configuration from a TOML file's `[discovery]` table.
//!
//! ```toml
//! [discovery]
//! extra_dirs = ["/opt/panel/extensions"]
//! name_prefixes = ["@acme/panel-ext-"]
//! config_dir = "/etc/smart-panel"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::CONFIG_PATH_ENV;
use crate::discovery::DiscoverOptions;
use crate::error::{Error, Result};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub discovery: DiscoverySection,
}

/// The `[discovery]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoverySection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_dirs: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefixes: Option<Vec<String>>,
    /// Directory holding `extensions.manifest.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,
}

impl DiscoveryConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`. Relative `extra_dirs` and `config_dir` entries are
    /// resolved against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !panel_fs::io::exists(path) {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = panel_fs::io::read_text(path)?;
        let mut config = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            let section = &mut config.discovery;
            for dir in &mut section.extra_dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
            if let Some(dir) = section.config_dir.as_mut().filter(|d| d.is_relative()) {
                *dir = base.join(&*dir);
            }
        }

        tracing::debug!(path = %path.display(), "loaded discovery config");
        Ok(config)
    }

    /// Discovery options described by this config.
    pub fn options(&self) -> DiscoverOptions {
        DiscoverOptions {
            extra_dirs: self.discovery.extra_dirs.clone(),
            name_prefixes: self.discovery.name_prefixes.clone(),
        }
    }

    /// The bundled-manifest directory: the configured one, else
    /// [`CONFIG_PATH_ENV`].
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.discovery
            .config_dir
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }
}
