//! gen4sprite CLI - command-line interface for the Gen 4 sprite tools

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "gen4sprite")]
#[command(about = "Gen4Sprite: NARC archive and Pokémon sprite tools for Gen 4 games", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the gen4sprite CLI
///
/// # Errors
/// Returns an error if the selected command fails.
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging (verbosity via RUST_LOG)
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
