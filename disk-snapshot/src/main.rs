//! Disk Snapshot - Main entry point

use anyhow::Result;
use clap::Parser;
use disk_snapshot::{cli::commands, cli::Cli, config::Config, utils};
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    utils::logger::init(&config.log, cli.log_level.as_deref())?;

    tracing::debug!("Starting disk-snapshot v{}", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli, &config, &mut out)?;
    out.flush()?;

    Ok(())
}
