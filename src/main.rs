use anyhow::Result;
use clap::Parser;
use quarto_snapshots::cli::{self, Cli};
use quarto_snapshots::runner::SystemRunner;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(&cli, &mut SystemRunner)?;

    Ok(())
}
