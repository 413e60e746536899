//! External alarm and notification facilities, and the reconciler that keeps
//! them in step with the current plan.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    BrewTimer    │    │ AlarmReconciler │    │ AlarmFacility   │
//! │ (start, cancel, │───▶│ (roles, past-due│───▶│ (one pending    │
//! │  param change)  │    │  filtering)     │    │  alarm per key) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                 │             ┌─────────────────┐
//!                                 └────────────▶│    Notifier     │
//!                                               │ (immediate)     │
//!                                               └─────────────────┘
//! ```
//!
//! Facilities are fire-and-forget. A refused request degrades to "no reminder
//! for that step" and never stops the brew.
//!
//! ## Implementations
//!
//! - [`memory`]: in-memory facility and notifier that record every request
//! - [`timers`]: tokio-timer facility that delivers payloads to a [`Notifier`]

use jiff::Timestamp;

use crate::error::Result;

pub mod memory;
pub mod reconciler;
pub mod timers;

pub use memory::{MemoryAlarms, MemoryNotifier, PendingAlarm};
pub use reconciler::{
    AlarmOutcome, AlarmReconciler, DefaultMessages, MessageFormat, ScheduleReport, StepRole,
};
pub use timers::TimerAlarms;

/// One-shot alarms keyed by a small integer.
///
/// Scheduling a key that already has a pending alarm replaces it, so at most
/// one alarm per key is ever pending.
pub trait AlarmFacility: Send + Sync {
    /// Requests an alarm that fires on or after `fire_at` with `payload`.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::PermissionDenied` if the facility refuses.
    fn schedule_once(&self, key: usize, fire_at: Timestamp, payload: &str) -> Result<()>;

    /// Cancels the pending alarm for `key`; a no-op if there is none.
    fn cancel(&self, key: usize);

    /// Cancels every pending alarm.
    fn cancel_all(&self);
}

/// Best-effort immediate notification.
pub trait Notifier: Send + Sync {
    /// Shows `payload` now. Failures are swallowed by the implementation.
    fn notify_now(&self, payload: &str);
}
