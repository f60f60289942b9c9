//! # reinforce
//!
//! Entry point for the training binary. Run with `--help` for the available
//! flags.

use anyhow::Result;
use clap::Parser;
use reinforce::{app, cli::Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level()).init();
    app::run(&cli)?;
    Ok(())
}
