//! Print the search roots

use std::path::PathBuf;

use colored::Colorize;
use panel_extensions::rank_root;
use serde::Serialize;

use crate::context::DiscoveryContext;
use crate::error::Result;

/// A search root as reported by `panel-ext paths`; `rank` is the rank of
/// packages installed in it
#[derive(Debug, Serialize)]
pub struct RootReport {
    pub path: PathBuf,
    pub rank: u8,
    pub exists: bool,
}

/// Search roots in walk order, annotated with rank and existence.
pub fn root_reports(ctx: &DiscoveryContext) -> Result<Vec<RootReport>> {
    Ok(ctx
        .discovery
        .search_roots(&ctx.options)?
        .into_iter()
        .map(|path| RootReport {
            rank: rank_root(&path),
            exists: path.is_dir(),
            path,
        })
        .collect())
}

/// Run the paths command
pub fn run_paths(ctx: &DiscoveryContext, json: bool) -> Result<()> {
    let reports = root_reports(ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{}", "Search Roots".bold());
    println!();
    for report in &reports {
        let path = report.path.display().to_string();
        let path = if report.exists {
            path.normal()
        } else {
            path.dimmed()
        };
        println!("  {} {}", format!("[{}]", report.rank).cyan(), path);
    }
    println!();
    println!(
        "{} higher rank wins when the same extension is found twice",
        "Note:".dimmed()
    );
    Ok(())
}
