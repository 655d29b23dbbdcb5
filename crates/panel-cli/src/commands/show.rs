//! Show one package's extensions

use colored::Colorize;
use panel_extensions::ExtensionCatalog;

use crate::context::DiscoveryContext;
use crate::error::{CliError, Result};

/// Run the show command
pub async fn run_show(ctx: &DiscoveryContext, name: &str, json: bool) -> Result<()> {
    let discovered = ctx.discovery.discover(&ctx.options).await?;
    let catalog = ExtensionCatalog::new(&discovered, ctx.bundled());
    let rows = catalog.find(name);

    if rows.is_empty() {
        return Err(CliError::user(format!(
            "No extension named '{name}' was discovered"
        )));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", name.green().bold());
    for row in &rows {
        println!();
        println!("  {:<13} {}", "surface:".dimmed(), row.surface.to_string().cyan());
        println!("  {:<13} {}", "kind:".dimmed(), row.kind);
        println!("  {:<13} {}", "display name:".dimmed(), row.display_name);
        if let Some(description) = &row.description {
            println!("  {:<13} {}", "description:".dimmed(), description);
        }
        if let Some(version) = &row.version {
            println!("  {:<13} {}", "version:".dimmed(), version);
        }
        println!("  {:<13} {}", "source:".dimmed(), row.source);
        if let Some(prefix) = &row.route_prefix {
            println!("  {:<13} /{}", "route:".dimmed(), prefix);
        }
        if let Some(asset) = &row.asset_path {
            println!("  {:<13} {}", "asset:".dimmed(), asset);
        }
    }

    for backend in discovered.backend_by_package(name) {
        tracing::debug!(dir = %backend.package_dir.display(), "backend package directory");
    }

    Ok(())
}
