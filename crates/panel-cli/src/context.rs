//! Discovery context assembled from flags, config file and environment
//!
//! Flags extend the config file: `--extra-dir` entries are appended to the
//! configured ones, and any `--prefix` replaces the configured prefixes.

use std::path::PathBuf;
use std::sync::Arc;

use panel_extensions::{
    BundledSet, DiscoverOptions, DiscoveryConfig, ExtensionDiscovery, NativeModuleLoader,
};

use crate::cli::Cli;
use crate::error::Result;

/// Everything a command needs to run discovery
#[derive(Debug)]
pub struct DiscoveryContext {
    pub discovery: ExtensionDiscovery,
    pub options: DiscoverOptions,
    pub config: DiscoveryConfig,
}

impl DiscoveryContext {
    /// Build the context for `cli`, loading `--config` if given.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => DiscoveryConfig::from_path(path)?,
            None => DiscoveryConfig::default(),
        };

        let mut options = config.options();
        options.extra_dirs.extend(cli.extra_dirs.iter().cloned());
        if !cli.prefixes.is_empty() {
            options.name_prefixes = Some(cli.prefixes.clone());
        }

        let mut discovery = ExtensionDiscovery::new(Arc::new(NativeModuleLoader::new()));
        if let Some(root) = &cli.root {
            discovery = discovery.with_root(root);
        }

        tracing::debug!(
            extra_dirs = options.extra_dirs.len(),
            custom_prefixes = options.name_prefixes.is_some(),
            "discovery context ready"
        );

        Ok(Self {
            discovery,
            options,
            config,
        })
    }

    /// Bundled extensions listed in the config directory, if one is known.
    pub fn bundled(&self) -> BundledSet {
        self.config_dir()
            .map(|dir| BundledSet::load(&dir))
            .unwrap_or_default()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config.config_dir()
    }
}
