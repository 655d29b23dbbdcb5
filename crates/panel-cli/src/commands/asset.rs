//! Resolve an admin asset

use panel_extensions::ExtensionCatalog;

use crate::context::DiscoveryContext;
use crate::error::{CliError, Result};

/// Run the asset command
pub async fn run_asset(ctx: &DiscoveryContext, package: &str, path: &str) -> Result<()> {
    let discovered = ctx.discovery.discover(&ctx.options).await?;
    let catalog = ExtensionCatalog::new(&discovered, ctx.bundled());

    match catalog.resolve_asset(package, path)? {
        Some(file) => {
            println!("{}", file.display());
            Ok(())
        }
        None => Err(CliError::user(format!(
            "Asset '{path}' not found for admin extension '{package}'"
        ))),
    }
}
