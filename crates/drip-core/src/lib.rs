//! Core library for the drip pour-over brew timer.
//!
//! This crate turns a bean mass and roast into a timed sequence of pours,
//! keeps external alarms in step with that sequence, and projects the running
//! brew into display rows.
//!
//! # Architecture
//!
//! - **Plans** ([`models`]): pure, deterministic step tables built from
//!   [`params::BrewParams`]
//! - **Engine** ([`timer`]): the single brew session and its state machine
//! - **Alarms** ([`alarm`]): reconciler plus pluggable facilities
//! - **Projection** ([`display`]): pure view of plan, session and instant,
//!   with `Display` wrappers for terminal output
//! - **Runtime** ([`driver`], [`ticker`], [`store`]): the async loop, the
//!   periodic clock resample and the persisted snapshot
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use drip_core::{
//!     clock::ManualClock, BrewParams, BrewTimerBuilder, MemoryAlarms, Roast, SessionState,
//! };
//! use jiff::{SignedDuration, Timestamp};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = ManualClock::new(Timestamp::from_second(1_700_000_000)?);
//! let mut timer = BrewTimerBuilder::new()
//!     .with_params(BrewParams::new("10", Roast::Dark))
//!     .with_clock(Arc::new(clock.clone()))
//!     .with_alarms(Arc::new(MemoryAlarms::default()))
//!     .build()?;
//!
//! timer.start()?;
//! clock.advance(SignedDuration::from_secs(130));
//! timer.tick()?;
//!
//! let view = timer.view();
//! assert_eq!(timer.state(), SessionState::Running);
//! assert_eq!(view.current, Some(1));
//! println!("{view}");
//! # Ok(())
//! # }
//! ```

pub mod alarm;
pub mod clock;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod models;
pub mod params;
pub mod store;
pub mod ticker;
pub mod timeline;
pub mod timer;

// Re-export commonly used types
pub use alarm::{
    AlarmFacility, AlarmReconciler, MemoryAlarms, MemoryNotifier, Notifier, ScheduleReport,
    TimerAlarms,
};
pub use config::TimingConfig;
pub use display::{BrewHeader, PlanTotals, Projection, StepView};
pub use driver::{DriverHandle, DriverUpdate};
pub use error::{BrewError, Result};
pub use models::{BrewPlan, BrewSession, PlanStep, Roast, SessionSnapshot, SessionState, StepKind};
pub use params::BrewParams;
pub use store::SessionStore;
pub use timer::{BrewTimer, BrewTimerBuilder, TickOutcome};
