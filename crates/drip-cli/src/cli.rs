//! Command arguments and handlers.
//!
//! Argument structs carry clap derives and convert into core
//! [`BrewParams`] via `From`, so the core crate stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → BrewParams → BrewTimer / driver
//! ```
//!
//! [`Cli`] holds what every command needs (the session store, timing and the
//! renderer) and has one method per command.

use std::{fmt, str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use drip_core::{
    clock::SystemClock,
    display::CurrentStep,
    driver::{self, DriverHandle, DriverUpdate},
    params::{is_bean_mass_input, DEFAULT_BEAN_MASS},
    BrewHeader, BrewParams, BrewTimerBuilder, Notifier, PlanTotals, Projection, Roast,
    SessionSnapshot, SessionState, SessionStore, TickOutcome, TimerAlarms, TimingConfig,
};
use log::{info, warn};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::{notifier::TerminalNotifier, renderer::TerminalRenderer};

/// Roast profile as a command-line value.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RoastArg {
    /// Medium roast: three pours
    Medium,
    /// Dark roast: four equal pours
    Dark,
}

impl From<RoastArg> for Roast {
    fn from(arg: RoastArg) -> Self {
        match arg {
            RoastArg::Medium => Roast::Medium,
            RoastArg::Dark => Roast::Dark,
        }
    }
}

fn parse_beans(text: &str) -> std::result::Result<String, String> {
    if is_bean_mass_input(text) {
        Ok(text.to_string())
    } else {
        Err(format!("'{text}' is not a bean mass, expected digits with an optional decimal point"))
    }
}

/// Show the pour plan
#[derive(Args)]
pub struct PlanArgs {
    /// Bean mass in grams
    #[arg(short, long, default_value = DEFAULT_BEAN_MASS, value_parser = parse_beans)]
    pub beans: String,
    /// Roast profile
    #[arg(short, long, value_enum, default_value_t = RoastArg::Dark)]
    pub roast: RoastArg,
}

impl From<PlanArgs> for BrewParams {
    fn from(args: PlanArgs) -> Self {
        BrewParams::new(args.beans, args.roast.into())
    }
}

/// Run an interactive brew
///
/// Flags left out keep the values of the saved session.
#[derive(Args)]
pub struct BrewArgs {
    /// Bean mass in grams
    #[arg(short, long, value_parser = parse_beans)]
    pub beans: Option<String>,
    /// Roast profile
    #[arg(short, long, value_enum)]
    pub roast: Option<RoastArg>,
    /// Start brewing right away instead of waiting for `start`
    #[arg(long)]
    pub now: bool,
}

impl BrewArgs {
    /// Applies the given flags on top of `saved`.
    pub fn apply_to(&self, saved: &BrewParams) -> BrewParams {
        let mut params = saved.clone();
        if let Some(beans) = &self.beans {
            params.set_bean_mass(beans.as_str());
        }
        if let Some(roast) = self.roast {
            params.roast = roast.into();
        }
        params
    }
}

/// A line typed during an interactive brew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewInput {
    Start,
    Cancel,
    Show,
    Beans(String),
    Roast(Roast),
    Help,
    Quit,
}

impl FromStr for BrewInput {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();
        match (command.as_str(), arg) {
            ("start", None) => Ok(BrewInput::Start),
            ("cancel", None) => Ok(BrewInput::Cancel),
            ("show" | "", None) => Ok(BrewInput::Show),
            ("beans", Some(text)) => parse_beans(text).map(BrewInput::Beans),
            ("beans", None) => Ok(BrewInput::Beans(String::new())),
            ("roast", Some(text)) => text.parse().map(BrewInput::Roast),
            ("help" | "?", None) => Ok(BrewInput::Help),
            ("quit" | "exit" | "q", None) => Ok(BrewInput::Quit),
            _ => Err(format!("Unknown command '{}'", line.trim())),
        }
    }
}

const BREW_HELP: &str = "\
**Commands:** `start`, `cancel`, `beans <grams>`, `roast <medium|dark>`, `show`, `quit`
";

impl fmt::Display for BrewInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrewInput::Start => write!(f, "start"),
            BrewInput::Cancel => write!(f, "cancel"),
            BrewInput::Show => write!(f, "show"),
            BrewInput::Beans(text) => write!(f, "beans {text}"),
            BrewInput::Roast(roast) => write!(f, "roast {roast}"),
            BrewInput::Help => write!(f, "help"),
            BrewInput::Quit => write!(f, "quit"),
        }
    }
}

/// Command handlers.
pub struct Cli {
    store: SessionStore,
    timing: TimingConfig,
    renderer: TerminalRenderer,
    alarms: bool,
}

impl Cli {
    pub fn new(store: SessionStore, timing: TimingConfig, renderer: TerminalRenderer, alarms: bool) -> Self {
        Self {
            store,
            timing,
            renderer,
            alarms,
        }
    }

    /// Prints the plan for `params` without starting anything.
    pub fn plan(&self, params: BrewParams) -> Result<()> {
        let timer = self.timer_builder().with_params(params).build()?;
        self.render_frame(timer.state(), &timer.snapshot(), &timer.view())?;
        self.renderer.render(&PlanTotals(timer.plan()).to_string())
    }

    /// Prints the saved brew as of now.
    ///
    /// A brew whose final highlight has closed is cleared from the store.
    pub fn status(&self) -> Result<()> {
        let mut timer = self.timer_builder().build()?;
        timer.restore(self.load_snapshot());

        if timer.is_active() && timer.tick()? == TickOutcome::Completed {
            timer.cancel();
            self.save(&timer.snapshot())?;
            self.renderer.render("Brew finished\n")?;
        }
        self.render_frame(timer.state(), &timer.snapshot(), &timer.view())
    }

    /// Cancels the saved brew.
    pub fn cancel(&self) -> Result<()> {
        let mut snapshot = self.load_snapshot();
        if snapshot.started_at.take().is_none() {
            return self.renderer.render("No brew in progress\n");
        }
        self.save(&snapshot)?;
        info!("Saved brew cancelled");
        self.renderer.render("Brew cancelled\n")
    }

    /// Runs an interactive brew until `quit`, end of input or Ctrl-C.
    ///
    /// The brew keeps running in the saved state after quitting; only
    /// `cancel` or completion ends it.
    pub async fn brew(&self, args: BrewArgs) -> Result<()> {
        let snapshot = self.load_snapshot();
        let params = args.apply_to(&snapshot.params);

        let clock = Arc::new(SystemClock);
        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new(self.renderer.is_rich()));
        let alarms = TimerAlarms::new(clock.clone(), notifier.clone())
            .context("Failed to set up alarms")?
            .with_permission(self.alarms);

        let mut timer = BrewTimerBuilder::new()
            .with_timing(self.timing)
            .with_clock(clock)
            .with_alarms(Arc::new(alarms))
            .with_notifier(notifier)
            .build()?;
        timer.restore(snapshot);

        let handle = driver::spawn(timer);
        if params != handle.current().snapshot.params {
            if let Err(e) = handle.set_params(params).await {
                warn!("Keeping saved parameters: {e}");
            }
        }
        if args.now && !handle.current().state.is_active() {
            self.report(handle.start().await.map(|_| ()))?;
        }

        self.renderer.render(BREW_HELP)?;
        let result = self.brew_loop(&handle).await;

        let timer = handle.shutdown().await?;
        self.save(&timer.snapshot())?;
        result
    }

    async fn brew_loop(&self, handle: &DriverHandle) -> Result<()> {
        let mut lines = BufReader::new(io::stdin()).lines();
        let mut updates = handle.updates();
        let mut shown = None;
        let mut counted = None;
        let mut saved = None;

        loop {
            let update = updates.borrow_and_update().clone();
            if saved.as_ref() != Some(&update.snapshot) {
                self.save(&update.snapshot)?;
                saved = Some(update.snapshot.clone());
            }
            let key = FrameKey::of(&update);
            let countdown = live_countdown(&update.projection);
            if shown.as_ref() != Some(&key) {
                self.render_frame(update.state, &update.snapshot, &update.projection)?;
                shown = Some(key);
            } else if countdown.is_some() && countdown != counted {
                self.renderer
                    .render(&CurrentStep(&update.projection).to_string())?;
            }
            counted = countdown;

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    match line.parse::<BrewInput>() {
                        Ok(BrewInput::Quit) => break,
                        Ok(BrewInput::Show) => shown = None,
                        Ok(BrewInput::Help) => self.renderer.render(BREW_HELP)?,
                        Ok(input) => self.apply(handle, &update, input).await?,
                        Err(message) => self.renderer.render(&format!("{message}\n"))?,
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn apply(&self, handle: &DriverHandle, update: &DriverUpdate, input: BrewInput) -> Result<()> {
        info!("Brew input: {input}");
        match input {
            BrewInput::Start => self.report(handle.start().await.map(|_| ())),
            BrewInput::Cancel => {
                handle.cancel().await?;
                self.renderer.render("Brew cancelled\n")
            }
            BrewInput::Beans(text) => {
                let mut params = update.snapshot.params.clone();
                params.set_bean_mass(text);
                self.report(handle.set_params(params).await.map(|_| ()))
            }
            BrewInput::Roast(roast) => {
                let params = BrewParams {
                    roast,
                    ..update.snapshot.params.clone()
                };
                self.report(handle.set_params(params).await.map(|_| ()))
            }
            BrewInput::Show | BrewInput::Help | BrewInput::Quit => Ok(()),
        }
    }

    /// Shows engine refusals to the user; anything else is fatal.
    fn report(&self, result: drip_core::Result<()>) -> Result<()> {
        match result {
            Err(e) if e.is_state_violation() => self.renderer.render(&format!("{e}\n")),
            other => Ok(other?),
        }
    }

    fn render_frame(
        &self,
        state: SessionState,
        snapshot: &SessionSnapshot,
        projection: &Projection,
    ) -> Result<()> {
        let header = BrewHeader::new(&snapshot.params, state).started_at(snapshot.started_at);
        self.renderer
            .render(&format!("{header}{projection}"))
    }

    /// Builder for one-shot commands; its alarms are never delivered.
    fn timer_builder(&self) -> BrewTimerBuilder {
        BrewTimerBuilder::new().with_timing(self.timing)
    }

    fn load_snapshot(&self) -> SessionSnapshot {
        match self.store.load() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable session state: {e}");
                SessionSnapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.store
            .save(snapshot)
            .with_context(|| format!("Failed to save session to {}", self.store.path().display()))
    }
}

/// What has to change for a frame to be drawn again.
#[derive(PartialEq)]
struct FrameKey {
    state: SessionState,
    current: Option<usize>,
    params: BrewParams,
}

impl FrameKey {
    fn of(update: &DriverUpdate) -> Self {
        Self {
            state: update.state,
            current: update.projection.current,
            params: update.snapshot.params.clone(),
        }
    }
}

/// Whole seconds left in the current step, when it has a wait.
///
/// Between full frames a change here prints one countdown line.
fn live_countdown(projection: &Projection) -> Option<i64> {
    projection
        .current_step()?
        .remaining_display()
        .map(|countdown| countdown.rounded_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brew_input() {
        let parse = |line: &str| line.parse::<BrewInput>();
        assert_eq!(parse("start"), Ok(BrewInput::Start));
        assert_eq!(parse("  Cancel "), Ok(BrewInput::Cancel));
        assert_eq!(parse(""), Ok(BrewInput::Show));
        assert_eq!(parse("beans 18.5"), Ok(BrewInput::Beans("18.5".to_string())));
        assert_eq!(parse("beans"), Ok(BrewInput::Beans(String::new())));
        assert_eq!(parse("roast m"), Ok(BrewInput::Roast(Roast::Medium)));
        assert_eq!(parse("q"), Ok(BrewInput::Quit));
    }

    #[test]
    fn test_parse_brew_input_rejects_garbage() {
        assert!("beans 1.2.3".parse::<BrewInput>().is_err());
        assert!("roast light".parse::<BrewInput>().is_err());
        assert!("start now".parse::<BrewInput>().is_err());
        assert!("brew".parse::<BrewInput>().is_err());
    }

    #[test]
    fn test_brew_args_override_saved_params() {
        let saved = BrewParams::new("15", Roast::Dark);
        let args = BrewArgs {
            beans: None,
            roast: Some(RoastArg::Medium),
            now: false,
        };
        let params = args.apply_to(&saved);
        assert_eq!(params.bean_mass, "15");
        assert_eq!(params.roast, Roast::Medium);
    }

    #[test]
    fn test_live_countdown_changes_every_second() {
        use drip_core::{display::project, BrewPlan, BrewSession};
        use jiff::{SignedDuration, Timestamp};

        let plan = BrewPlan::build("20", Roast::Medium);
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let session = BrewSession::started(start);
        let timing = TimingConfig::default();
        let at = |ms| {
            let now = start + SignedDuration::from_millis(ms);
            live_countdown(&project(&plan, &session, Some(now), &timing))
        };

        assert_eq!(at(150_000), Some(150));
        assert_eq!(at(151_000), Some(149));
        assert_eq!(at(151_200), at(151_000));
        assert_eq!(at(300_000), None);
        assert_eq!(
            live_countdown(&project(&plan, &BrewSession::default(), None, &timing)),
            None
        );
    }

    #[test]
    fn test_plan_args_into_params() {
        let params: BrewParams = PlanArgs {
            beans: "20".to_string(),
            roast: RoastArg::Medium,
        }
        .into();
        assert_eq!(params, BrewParams::new("20", Roast::Medium));
    }
}
