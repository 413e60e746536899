//! Builder for creating and configuring BrewTimer instances.

use std::sync::Arc;

use super::BrewTimer;
use crate::{
    alarm::{AlarmFacility, AlarmReconciler, MemoryAlarms, MemoryNotifier, MessageFormat, Notifier},
    clock::{Clock, SystemClock},
    config::TimingConfig,
    error::Result,
    models::{BrewPlan, BrewSession, SessionState},
    params::BrewParams,
};

/// Builder for creating and configuring BrewTimer instances.
///
/// Anything not set falls back to a default: the system clock, default
/// timing, default parameters, and in-memory alarm and notification
/// facilities that only record what they are asked to do.
#[derive(Default)]
pub struct BrewTimerBuilder {
    timing: Option<TimingConfig>,
    params: Option<BrewParams>,
    clock: Option<Arc<dyn Clock>>,
    alarms: Option<Arc<dyn AlarmFacility>>,
    notifier: Option<Arc<dyn Notifier>>,
    messages: Option<Arc<dyn MessageFormat>>,
}

impl BrewTimerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timing configuration.
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Sets the initial parameters.
    pub fn with_params(mut self, params: BrewParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the clock the timer samples.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the alarm facility.
    pub fn with_alarms(mut self, alarms: Arc<dyn AlarmFacility>) -> Self {
        self.alarms = Some(alarms);
        self
    }

    /// Sets the immediate notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replaces the notification message templates.
    pub fn with_messages(mut self, messages: Arc<dyn MessageFormat>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Builds an idle timer.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::Configuration` if the timing configuration is
    /// invalid.
    pub fn build(self) -> Result<BrewTimer> {
        let timing = self.timing.unwrap_or_default();
        timing.validate()?;

        let params = self.params.unwrap_or_default();
        let plan = BrewPlan::from_params(&params, timing.wait_unit);

        let alarms = self
            .alarms
            .unwrap_or_else(|| Arc::new(MemoryAlarms::default()));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(MemoryNotifier::default()));
        let mut reconciler = AlarmReconciler::new(alarms, notifier);
        if let Some(messages) = self.messages {
            reconciler = reconciler.with_messages(messages);
        }

        Ok(BrewTimer {
            timing,
            params,
            plan,
            session: BrewSession::default(),
            state: SessionState::Idle,
            reconciler,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
