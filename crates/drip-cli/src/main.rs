//! Drip CLI Application
//!
//! Command-line interface for the drip pour-over brew timer.

mod args;
mod cli;
mod notifier;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use drip_core::{SessionStore, TimingConfig};
use jiff::SignedDuration;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        state_file,
        no_color,
        wait_unit_ms,
        no_alarms,
        command,
    } = Args::parse();

    let store = match state_file {
        Some(path) => SessionStore::new(path),
        None => SessionStore::at_default_path().context("Failed to locate session state")?,
    };

    let wait_unit_ms = i64::try_from(wait_unit_ms).context("Wait unit is too large")?;
    let timing = TimingConfig {
        wait_unit: SignedDuration::from_millis(wait_unit_ms),
        ..TimingConfig::default()
    };
    timing.validate().context("Invalid timing")?;

    let cli = Cli::new(store, timing, TerminalRenderer::new(!no_color), !no_alarms);

    info!("Drip started");

    match command {
        Some(Plan(args)) => cli.plan(args.into()),
        Some(Brew(args)) => cli.brew(args).await,
        Some(Cancel) => cli.cancel(),
        Some(Status) | None => cli.status(),
    }
}
