//! Async event loop that owns a [`BrewTimer`] and its [`ClockTicker`].
//!
//! Callers talk to the loop through a [`DriverHandle`]; every change is
//! published as a [`DriverUpdate`] on a watch channel so a UI can redraw from
//! the latest frame without ever touching the engine.
//!
//! ```text
//! ┌──────────────┐  commands   ┌──────────────────────────┐  watch   ┌──────────┐
//! │ DriverHandle │────────────▶│ run loop                 │─────────▶│ UI / CLI │
//! └──────────────┘  (mpsc)     │  BrewTimer + ClockTicker │          └──────────┘
//!                              └──────────────────────────┘
//!                                   ▲             │
//!                                   └── Tick ◀────┘ (armed while active)
//! ```
//!
//! A tick that reports [`TickOutcome::Completed`] cancels the brew.

use log::{debug, info};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    alarm::ScheduleReport,
    display::Projection,
    error::{BrewError, Result},
    models::{SessionSnapshot, SessionState},
    params::BrewParams,
    ticker::{ClockTicker, Tick},
    timer::{BrewTimer, TickOutcome},
};

const COMMAND_BUFFER: usize = 16;
const TICK_BUFFER: usize = 4;

/// One published frame of driver state.
#[derive(Debug, Clone)]
pub struct DriverUpdate {
    pub state: SessionState,
    pub projection: Projection,
    pub snapshot: SessionSnapshot,
    /// Whether the periodic resample is armed
    pub ticking: bool,
}

enum Command {
    Start(oneshot::Sender<Result<ScheduleReport>>),
    Cancel(oneshot::Sender<()>),
    SetParams(BrewParams, oneshot::Sender<Result<Option<ScheduleReport>>>),
    Shutdown,
}

/// Handle to a running driver.
pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    updates: watch::Receiver<DriverUpdate>,
    task: JoinHandle<BrewTimer>,
}

impl DriverHandle {
    /// Starts a brew.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` unless idle, or
    /// `BrewError::DriverStopped` if the loop has exited.
    pub async fn start(&self) -> Result<ScheduleReport> {
        self.request(Command::Start).await?
    }

    /// Cancels the brew, if any.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::DriverStopped` if the loop has exited.
    pub async fn cancel(&self) -> Result<()> {
        self.request(Command::Cancel).await
    }

    /// Applies new parameters.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` while completing, or
    /// `BrewError::DriverStopped` if the loop has exited.
    pub async fn set_params(&self, params: BrewParams) -> Result<Option<ScheduleReport>> {
        self.request(|reply| Command::SetParams(params, reply))
            .await?
    }

    /// A receiver for published frames.
    pub fn updates(&self) -> watch::Receiver<DriverUpdate> {
        self.updates.clone()
    }

    /// The latest published frame.
    pub fn current(&self) -> DriverUpdate {
        self.updates.borrow().clone()
    }

    /// Stops the loop and hands the engine back.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::DriverStopped` if the loop task panicked or was
    /// aborted.
    pub async fn shutdown(self) -> Result<BrewTimer> {
        // A closed channel means the loop is already on its way out.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await.map_err(|_| BrewError::DriverStopped)
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| BrewError::DriverStopped)?;
        response.await.map_err(|_| BrewError::DriverStopped)
    }
}

/// Moves `timer` into a background task and returns its handle.
///
/// A timer that is already active (typically one that was just restored)
/// gets its future alarms re-issued and the ticker armed. Must be called
/// from within a tokio runtime.
pub fn spawn(timer: BrewTimer) -> DriverHandle {
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    let (tick_tx, tick_rx) = mpsc::channel(TICK_BUFFER);
    let ticker = ClockTicker::new(timer.timing().tick_period);
    let (updates_tx, updates_rx) = watch::channel(frame(&timer, false));

    let mut driver = Driver {
        timer,
        ticker,
        tick_tx,
        updates: updates_tx,
    };
    driver.resume();

    let task = tokio::spawn(driver.run(commands_rx, tick_rx));
    DriverHandle {
        commands: commands_tx,
        updates: updates_rx,
        task,
    }
}

fn frame(timer: &BrewTimer, ticking: bool) -> DriverUpdate {
    DriverUpdate {
        state: timer.state(),
        projection: timer.view(),
        snapshot: timer.snapshot(),
        ticking,
    }
}

struct Driver {
    timer: BrewTimer,
    ticker: ClockTicker,
    tick_tx: mpsc::Sender<Tick>,
    updates: watch::Sender<DriverUpdate>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut ticks: mpsc::Receiver<Tick>,
    ) -> BrewTimer {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(Tick) = ticks.recv() => self.on_tick(),
            }
        }

        self.ticker.disarm();
        debug!("Driver stopped");
        self.timer
    }

    fn resume(&mut self) {
        if !self.timer.is_active() {
            return;
        }
        if let Some(report) = self.timer.resume_alarms() {
            info!("Resumed brew, {} alarms re-issued", report.scheduled().len());
        }
        self.ticker.arm(self.tick_tx.clone());
        self.publish();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start(reply) => {
                let result = self.timer.start();
                if result.is_ok() {
                    self.ticker.arm(self.tick_tx.clone());
                }
                self.publish();
                let _ = reply.send(result);
            }
            Command::Cancel(reply) => {
                self.timer.cancel();
                self.ticker.disarm();
                self.publish();
                let _ = reply.send(());
            }
            Command::SetParams(params, reply) => {
                let result = self.timer.set_params(params);
                self.publish();
                let _ = reply.send(result);
            }
            Command::Shutdown => {}
        }
    }

    fn on_tick(&mut self) {
        // Ticks queued before a disarm are dropped here.
        if !self.timer.is_active() {
            return;
        }
        match self.timer.tick() {
            Ok(TickOutcome::Completed) => {
                self.timer.cancel();
                self.ticker.disarm();
            }
            Ok(_) => {}
            Err(e) => debug!("Tick ignored: {e}"),
        }
        self.publish();
    }

    fn publish(&self) {
        self.updates
            .send_replace(frame(&self.timer, self.ticker.is_armed()));
    }
}
