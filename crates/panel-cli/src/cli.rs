//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use panel_extensions::ExtensionSurface;

/// Smart panel extensions - inspect what the backend would discover and load
#[derive(Parser, Debug)]
#[command(name = "panel-ext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Application package root (defaults to the current directory)
    #[arg(long, global = true, env = "PANEL_EXT_ROOT")]
    pub root: Option<PathBuf>,

    /// Discovery config file (TOML with a [discovery] table)
    #[arg(long, global = true, env = "PANEL_EXT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra directory to search (repeatable)
    #[arg(long = "extra-dir", global = true)]
    pub extra_dirs: Vec<PathBuf>,

    /// Accepted package-name prefix (repeatable; replaces the defaults)
    #[arg(long = "prefix", global = true)]
    pub prefixes: Vec<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List discovered extensions
    ///
    /// Examples:
    ///   panel-ext list                   # Everything
    ///   panel-ext list --surface backend # Backend extensions only
    ///   panel-ext list --json            # Machine-readable
    List {
        /// Which surface to list
        #[arg(long, value_enum, default_value_t = SurfaceFilter::All)]
        surface: SurfaceFilter,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show everything discovered for one package
    Show {
        /// Package name, e.g. @fastybird/smart-panel-module-acme
        name: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the search roots in walk order with their precedence rank
    Paths {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the precedence rank of a package directory
    Rank {
        /// Directory to rank (not required to exist)
        path: PathBuf,
    },

    /// Resolve a file inside an admin extension's package
    Asset {
        /// Package name
        package: String,

        /// Package-relative asset path
        path: String,
    },
}

/// `--surface` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFilter {
    All,
    Admin,
    Backend,
}

impl SurfaceFilter {
    pub fn surface(self) -> Option<ExtensionSurface> {
        match self {
            Self::All => None,
            Self::Admin => Some(ExtensionSurface::Admin),
            Self::Backend => Some(ExtensionSurface::Backend),
        }
    }
}
