//! Smart panel extension CLI
//!
//! Runs the same discovery the panel backend runs at startup and reports
//! what it finds.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::DiscoveryContext;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let Some(command) = cli.command.clone() else {
        println!("{} Smart panel extensions", "panel-ext".green().bold());
        println!();
        println!("Run {} for available commands.", "panel-ext --help".cyan());
        return Ok(());
    };

    if let Commands::Rank { path } = &command {
        return commands::run_rank(path);
    }

    let ctx = DiscoveryContext::from_cli(&cli)?;
    match command {
        Commands::List { surface, json } => commands::run_list(&ctx, surface.surface(), json).await,
        Commands::Show { name, json } => commands::run_show(&ctx, &name, json).await,
        Commands::Paths { json } => commands::run_paths(&ctx, json),
        Commands::Asset { package, path } => commands::run_asset(&ctx, &package, &path).await,
        Commands::Rank { path } => commands::run_rank(&path),
    }
}
