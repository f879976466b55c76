//! `generator` — sender-side CLI.
//!
//! Startup sequence:
//! 1. Parse the command line and load [`config::Config`] from the environment.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Run the selected subcommand and print its output on stdout.

mod cli;
mod commands;
mod config;
mod telemetry;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cli = Cli::parse();
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: generator configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Command
    // -----------------------------------------------------------------------
    let output = match cli.command {
        Command::Seal(args) => {
            let base_url = cfg.base_url(args.base_url.as_deref())?;
            commands::seal(args, base_url).await?
        }
        Command::Batch(args) => {
            let base_url = cfg.base_url(args.base_url.as_deref())?;
            commands::batch(args, base_url).await?
        }
        Command::Open(args) => commands::open(&args).await?,
    };
    println!("{output}");
    Ok(())
}
