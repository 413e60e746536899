use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{BrewArgs, PlanArgs};

/// Pour-over coffee timer for the terminal
///
/// Drip turns a bean mass and a roast into a sequence of timed pours and
/// reminds you when each one is due. A running brew is saved after every
/// change, so it survives quitting and can be resumed or inspected later.
#[derive(Parser)]
#[command(version, about, name = "drip")]
pub struct Args {
    /// Path to the session state file. Defaults to
    /// $XDG_STATE_HOME/drip/session.json
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Length of one wait unit in milliseconds
    #[arg(
        long,
        global = true,
        default_value_t = 60_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub wait_unit_ms: u64,

    /// Do not schedule reminders for later pours
    #[arg(long, global = true)]
    pub no_alarms: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the drip CLI
///
/// Without a command, `status` is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the pour plan for a bean mass and roast
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Run an interactive brew, resuming a saved one if present
    #[command(alias = "b")]
    Brew(BrewArgs),
    /// Show the saved brew as of now
    #[command(alias = "s")]
    Status,
    /// Cancel the saved brew
    #[command(alias = "c")]
    Cancel,
}
