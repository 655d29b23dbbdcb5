//! List discovered extensions

use colored::Colorize;
use panel_extensions::{ExtensionCatalog, ExtensionSummary, ExtensionSurface};

use crate::context::DiscoveryContext;
use crate::error::Result;

/// Run the list command
pub async fn run_list(
    ctx: &DiscoveryContext,
    surface: Option<ExtensionSurface>,
    json: bool,
) -> Result<()> {
    let discovered = ctx.discovery.discover(&ctx.options).await?;
    let catalog = ExtensionCatalog::new(&discovered, ctx.bundled());
    let rows = catalog.summarize(surface);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print!("{}", render_rows(&rows));
    Ok(())
}

/// Human-readable table of `rows`, one line per extension.
pub fn render_rows(rows: &[ExtensionSummary]) -> String {
    if rows.is_empty() {
        return format!("{}\n", "No extensions discovered.".dimmed());
    }

    let mut out = format!("{}\n\n", "Discovered Extensions".bold());
    for row in rows {
        let location = match (&row.route_prefix, &row.asset_path) {
            (Some(prefix), _) => format!("/{prefix}"),
            (None, Some(asset)) => asset.clone(),
            (None, None) => String::new(),
        };
        out.push_str(&format!(
            "  {:<8} {:<7} {} {} {}\n",
            row.surface.to_string().cyan(),
            row.kind,
            row.name.green(),
            row.version.as_deref().unwrap_or("-").dimmed(),
            location.dimmed(),
        ));
        if row.display_name != row.name {
            out.push_str(&format!("           {}\n", row.display_name));
        }
    }
    out.push_str(&format!("\n{} {}\n", "Total:".dimmed(), rows.len()));
    out
}
