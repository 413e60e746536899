//! Turns a plan and a start instant into external alarms.

use std::sync::Arc;

use jiff::Timestamp;
use log::{debug, warn};

use super::{AlarmFacility, Notifier};
use crate::{display::Grams, models::BrewPlan};

/// Position of a step within its plan, which picks the message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    /// First pour, announced as soon as the brew starts
    First,
    /// A pour between the first and the last
    Middle,
    /// Final pour; a single-step plan's only step is also `Last`
    Last,
}

impl StepRole {
    /// Role of the step at `index` in `plan`.
    pub fn of(plan: &BrewPlan, index: usize) -> Self {
        if index >= plan.last_index() {
            StepRole::Last
        } else if index == 0 {
            StepRole::First
        } else {
            StepRole::Middle
        }
    }
}

/// Renders notification text for a step.
pub trait MessageFormat: Send + Sync {
    /// Text for a step with the given role and cumulative water target.
    fn render(&self, role: StepRole, target_amount: f64) -> String;
}

/// English message templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageFormat for DefaultMessages {
    fn render(&self, role: StepRole, target_amount: f64) -> String {
        let amount = Grams(target_amount);
        match role {
            StepRole::First => format!("Start pouring to {amount}"),
            StepRole::Middle => format!("Wait, then pour to {amount}"),
            StepRole::Last => format!("Pour to {amount}, then done"),
        }
    }
}

/// What happened to one step while scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmOutcome {
    /// Shown immediately through the notifier
    NotifiedNow,
    /// Alarm requested for the instant
    Scheduled(Timestamp),
    /// Instant was not in the future, so no alarm was requested
    PastDue(Timestamp),
    /// The facility refused the request
    Denied(Timestamp),
}

/// Per-step record of a scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub outcomes: Vec<(usize, AlarmOutcome)>,
}

impl ScheduleReport {
    /// Outcome for the step at `index`.
    pub fn outcome(&self, index: usize) -> Option<AlarmOutcome> {
        self.outcomes
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, outcome)| *outcome)
    }

    /// Steps that received an alarm.
    pub fn scheduled(&self) -> Vec<usize> {
        self.filter(|o| matches!(o, AlarmOutcome::Scheduled(_)))
    }

    /// Steps skipped as past-due.
    pub fn past_due(&self) -> Vec<usize> {
        self.filter(|o| matches!(o, AlarmOutcome::PastDue(_)))
    }

    /// Steps the facility refused.
    pub fn denied(&self) -> Vec<usize> {
        self.filter(|o| matches!(o, AlarmOutcome::Denied(_)))
    }

    fn filter(&self, pred: impl Fn(&AlarmOutcome) -> bool) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| pred(outcome))
            .map(|(index, _)| *index)
            .collect()
    }
}

/// Keeps external alarms consistent with the current plan.
///
/// Alarm keys are step indices. Step 0 never gets an alarm: it starts with the
/// brew, so [`schedule`](Self::schedule) announces it through the notifier.
#[derive(Clone)]
pub struct AlarmReconciler {
    alarms: Arc<dyn AlarmFacility>,
    notifier: Arc<dyn Notifier>,
    messages: Arc<dyn MessageFormat>,
}

impl AlarmReconciler {
    /// Creates a reconciler using the default message templates.
    pub fn new(alarms: Arc<dyn AlarmFacility>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            alarms,
            notifier,
            messages: Arc::new(DefaultMessages),
        }
    }

    /// Replaces the message templates.
    pub fn with_messages(mut self, messages: Arc<dyn MessageFormat>) -> Self {
        self.messages = messages;
        self
    }

    /// Notification text for the step at `index`.
    pub fn message_for(&self, plan: &BrewPlan, index: usize) -> String {
        self.messages.render(
            StepRole::of(plan, index),
            plan[index].cumulative_target_amount,
        )
    }

    /// Announces step 0 and requests alarms for every later step whose
    /// instant is still ahead of `now`.
    pub fn schedule(&self, plan: &BrewPlan, started_at: Timestamp, now: Timestamp) -> ScheduleReport {
        self.notifier.notify_now(&self.message_for(plan, 0));
        let mut report = ScheduleReport {
            outcomes: vec![(0, AlarmOutcome::NotifiedNow)],
        };
        self.request_from(plan, started_at, now, 1, &mut report);
        report
    }

    /// Requests alarms for every step whose instant is still ahead of `now`,
    /// without the immediate announcement.
    ///
    /// Used after a parameter change or a restore, when step 0 has already
    /// been announced.
    pub fn reschedule(&self, plan: &BrewPlan, started_at: Timestamp, now: Timestamp) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        self.request_from(plan, started_at, now, 0, &mut report);
        report
    }

    /// Cancels the alarms keyed `1..=max_step_index`.
    pub fn cancel(&self, max_step_index: usize) {
        for key in 1..=max_step_index {
            self.alarms.cancel(key);
        }
        debug!("Cancelled alarms 1..={max_step_index}");
    }

    /// Cancels every alarm the facility holds.
    pub fn cancel_all(&self) {
        self.alarms.cancel_all();
    }

    fn request_from(
        &self,
        plan: &BrewPlan,
        started_at: Timestamp,
        now: Timestamp,
        first: usize,
        report: &mut ScheduleReport,
    ) {
        for index in first..plan.len() {
            let fire_at = plan.step_starts_at(started_at, index);
            let outcome = if fire_at <= now {
                debug!("Skipping past-due alarm {index} at {fire_at}");
                AlarmOutcome::PastDue(fire_at)
            } else {
                let message = self.message_for(plan, index);
                match self.alarms.schedule_once(index, fire_at, &message) {
                    Ok(()) => AlarmOutcome::Scheduled(fire_at),
                    Err(e) => {
                        warn!("No reminder for step {index}: {e}");
                        AlarmOutcome::Denied(fire_at)
                    }
                }
            };
            report.outcomes.push((index, outcome));
        }
    }
}
