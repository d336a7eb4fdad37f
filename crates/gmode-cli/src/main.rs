// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Command-Line Driver
// ─────────────────────────────────────────────────────────────────────

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Library crates log through `log`; the subscriber picks those up too.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Patterns(args) => commands::patterns::run(args),
        Commands::CredibleRegion(args) => commands::credible_region::run(args),
    }
}
