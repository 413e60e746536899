//! The brew timing engine.
//!
//! [`BrewTimer`] owns the single brew session, the current plan and the alarm
//! reconciler, and is the only thing that mutates them.
//!
//! # State machine
//!
//! ```text
//!            start()                 last wait elapsed
//!   Idle ─────────────▶ Running ─────────────────────▶ Completing
//!    ▲                    │  ▲                             │
//!    │     cancel()       │  │ parameter_changed()         │ highlight window
//!    ├────────────────────┘  └──┘                          │ elapsed: tick()
//!    │                                                     │ reports Completed
//!    └──────────────── cancel() ◀──────────────────────────┘
//! ```
//!
//! `tick()` resamples the clock and moves between `Running` and `Completing`;
//! it never changes `started_at`. Calls that make no sense in the current
//! state return `BrewError::StateViolation` and leave everything untouched,
//! except `cancel()`, which is always safe.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use drip_core::{
//!     alarm::{MemoryAlarms, MemoryNotifier},
//!     clock::ManualClock,
//!     models::{Roast, SessionState},
//!     params::BrewParams,
//!     timer::{BrewTimerBuilder, TickOutcome},
//! };
//! use jiff::{SignedDuration, Timestamp};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = ManualClock::new(Timestamp::from_second(1_700_000_000)?);
//! let alarms = Arc::new(MemoryAlarms::default());
//!
//! let mut timer = BrewTimerBuilder::new()
//!     .with_params(BrewParams::new("20", Roast::Medium))
//!     .with_clock(Arc::new(clock.clone()))
//!     .with_alarms(alarms.clone())
//!     .with_notifier(Arc::new(MemoryNotifier::default()))
//!     .build()?;
//!
//! timer.start()?;
//! assert_eq!(alarms.pending().len(), 2);
//!
//! clock.advance(SignedDuration::from_secs(150));
//! assert_eq!(timer.tick()?, TickOutcome::Pouring { step: 1 });
//!
//! timer.cancel();
//! assert_eq!(timer.state(), SessionState::Idle);
//! assert!(alarms.pending().is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use jiff::Timestamp;
use log::{debug, info};

pub mod builder;


pub use builder::BrewTimerBuilder;

use crate::{
    alarm::{AlarmReconciler, ScheduleReport},
    clock::Clock,
    config::TimingConfig,
    display::{project, Projection},
    error::{BrewError, Result},
    models::{BrewPlan, BrewSession, SessionSnapshot, SessionState},
    params::BrewParams,
    timeline::{Position, Timeline},
};

/// Result of resampling the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A pour or wait is under way; `step` is the current step
    Pouring { step: usize },
    /// The final step's highlight window is open
    Completing,
    /// Every window has closed; the caller should cancel
    Completed,
}

/// Main timing engine for a single brew.
pub struct BrewTimer {
    pub(crate) timing: TimingConfig,
    pub(crate) params: BrewParams,
    pub(crate) plan: BrewPlan,
    pub(crate) session: BrewSession,
    pub(crate) state: SessionState,
    pub(crate) reconciler: AlarmReconciler,
    pub(crate) clock: Arc<dyn Clock>,
}

impl BrewTimer {
    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current parameters.
    pub fn params(&self) -> &BrewParams {
        &self.params
    }

    /// Plan the session is following (or would follow if started).
    pub fn plan(&self) -> &BrewPlan {
        &self.plan
    }

    /// The session record.
    pub fn session(&self) -> &BrewSession {
        &self.session
    }

    /// Timing configuration.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Whether a brew is in progress (running or completing).
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether the session was restored and not yet ticked.
    pub fn needs_tick(&self) -> bool {
        self.session.needs_tick()
    }

    /// Starts a brew now.
    ///
    /// Announces the first pour and schedules alarms for the others.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` unless the timer is idle.
    pub fn start(&mut self) -> Result<ScheduleReport> {
        if self.state != SessionState::Idle {
            return Err(BrewError::state_violation("start").in_state(self.state));
        }

        let now = self.clock.now();
        self.session = BrewSession::started(now);
        self.state = SessionState::Running;
        info!(
            "Brew started: {} roast, {} g beans",
            self.params.roast, self.params.bean_mass
        );

        Ok(self.reconciler.schedule(&self.plan, now, now))
    }

    /// Cancels the brew and every pending alarm.
    ///
    /// Safe to call in any state; from idle it only re-cancels alarms.
    pub fn cancel(&mut self) {
        self.reconciler.cancel(self.plan.last_index());
        if self.state == SessionState::Idle {
            debug!("Cancel while idle");
            return;
        }
        self.session = BrewSession::default();
        self.state = SessionState::Idle;
        info!("Brew cancelled");
    }

    /// Resamples the clock and updates the lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` while idle.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let Some(started_at) = self.session.started_at else {
            return Err(BrewError::state_violation("tick").in_state(self.state));
        };

        let now = self.clock.now();
        self.session.current_at = Some(now);

        let timeline = Timeline::new(&self.plan, started_at, self.timing.highlight_window);
        let outcome = match timeline.position(now) {
            Position::NotStarted => TickOutcome::Pouring { step: 0 },
            Position::Pouring(step) => TickOutcome::Pouring { step },
            Position::Draining(_) => TickOutcome::Completing,
            Position::Finished => TickOutcome::Completed,
        };

        let next = match outcome {
            TickOutcome::Pouring { .. } => SessionState::Running,
            TickOutcome::Completing | TickOutcome::Completed => SessionState::Completing,
        };
        if next != self.state {
            debug!("Timer {} -> {}", self.state, next);
            self.state = next;
        }
        if outcome == TickOutcome::Completed {
            info!("Brew complete");
        }
        Ok(outcome)
    }

    /// Switches a running brew to the plan for `params`.
    ///
    /// Keeps `started_at`, cancels every alarm of the old plan and re-issues
    /// alarms for the steps of the new plan that are still ahead. The new
    /// params are what [`snapshot`](Self::snapshot) saves from then on.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` unless the timer is running.
    pub fn parameter_changed(&mut self, params: BrewParams) -> Result<ScheduleReport> {
        let started_at = match (self.state, self.session.started_at) {
            (SessionState::Running, Some(started_at)) => started_at,
            _ => {
                return Err(BrewError::state_violation("change parameters").in_state(self.state))
            }
        };

        self.reconciler.cancel(self.plan.last_index());
        self.plan = BrewPlan::from_params(&params, self.timing.wait_unit);
        self.params = params;
        let now = self.clock.now();
        info!("Plan changed mid-brew");
        Ok(self.reconciler.reschedule(&self.plan, started_at, now))
    }

    /// Applies new parameters.
    ///
    /// While idle this only rebuilds the plan. While running it goes through
    /// [`parameter_changed`](Self::parameter_changed) and returns its report.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::StateViolation` while completing, when the
    /// configuration is locked by the final highlight.
    pub fn set_params(&mut self, params: BrewParams) -> Result<Option<ScheduleReport>> {
        match self.state {
            SessionState::Idle => {
                self.plan = BrewPlan::from_params(&params, self.timing.wait_unit);
                self.params = params;
                Ok(None)
            }
            SessionState::Running => self.parameter_changed(params).map(Some),
            SessionState::Completing => {
                Err(BrewError::state_violation("change parameters").in_state(self.state))
            }
        }
    }

    /// Re-issues alarms for a restored brew.
    ///
    /// Steps whose instant has passed are skipped. Does nothing while idle.
    pub fn resume_alarms(&self) -> Option<ScheduleReport> {
        let started_at = self.session.started_at?;
        self.reconciler.cancel(self.plan.last_index());
        Some(
            self.reconciler
                .reschedule(&self.plan, started_at, self.clock.now()),
        )
    }

    /// Replaces the session with saved state.
    ///
    /// A snapshot with a start instant comes back as `Running` with no clock
    /// sample, so [`needs_tick`](Self::needs_tick) is true until the next
    /// tick. Alarms are not touched; see [`resume_alarms`](Self::resume_alarms).
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        self.plan = BrewPlan::from_params(&snapshot.params, self.timing.wait_unit);
        self.params = snapshot.params;
        match snapshot.started_at {
            Some(started_at) => {
                self.session = BrewSession::restored(started_at);
                self.state = SessionState::Running;
                info!("Restored brew started at {started_at}");
            }
            None => {
                self.session = BrewSession::default();
                self.state = SessionState::Idle;
            }
        }
    }

    /// State worth saving across a restart.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            params: self.params.clone(),
            started_at: self.session.started_at,
        }
    }

    /// Display rows at the last sampled instant.
    pub fn view(&self) -> Projection {
        self.view_at(self.session.current_at)
    }

    /// Display rows at an arbitrary instant.
    pub fn view_at(&self, now: Option<Timestamp>) -> Projection {
        project(&self.plan, &self.session, now, &self.timing)
    }
}
