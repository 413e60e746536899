//! Periodic clock resample while a brew runs.
//!
//! [`ClockTicker`] owns at most one background interval task. Arming an armed
//! ticker does nothing, so a restore followed by a start never doubles the
//! tick rate.
//!
//! ```text
//!          arm(tx)                   disarm() / drop
//!  Disarmed ───────▶ Armed ─────────────────────────▶ Disarmed
//!                     │  ▲
//!                     └──┘ arm(tx): no-op
//! ```

use std::time::Duration;

use jiff::SignedDuration;
use log::debug;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

/// A tick signal; the receiver samples its own clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Sends a [`Tick`] every period until disarmed.
#[derive(Debug)]
pub struct ClockTicker {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Creates a disarmed ticker with the given period.
    ///
    /// A non-positive period is treated as its absolute value, floored at one
    /// millisecond.
    pub fn new(period: SignedDuration) -> Self {
        Self {
            period: period.unsigned_abs().max(Duration::from_millis(1)),
            task: None,
        }
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the background task is running.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts sending ticks to `tx`, the first one immediately.
    ///
    /// Returns `false` without doing anything if the ticker is already armed.
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, tx: mpsc::Sender<Tick>) -> bool {
        if self.is_armed() {
            return false;
        }

        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match tx.try_send(Tick) {
                    Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {}
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        }));
        debug!("Ticker armed every {period:?}");
        true
    }

    /// Stops the background task. A no-op while disarmed.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Ticker disarmed");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}
