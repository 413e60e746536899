//! Pure projection of a plan and session onto renderable step rows.

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use super::Countdown;
use crate::{
    config::TimingConfig,
    models::{BrewPlan, BrewSession},
    timeline::{Position, Timeline},
};

/// One row of the brew display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    /// Step index within the plan
    pub index: usize,
    /// Cumulative water target for this pour
    pub target_amount: f64,
    /// Time left in this step's wait; `None` for the final step
    pub remaining: Option<SignedDuration>,
    /// Whether this step's window contains the current instant
    pub is_current: bool,
    /// Whether this is the final pour
    pub is_final: bool,
}

impl StepView {
    /// Remaining time formatted for display; `None` for the final step.
    pub fn remaining_display(&self) -> Option<Countdown> {
        self.remaining.map(Countdown)
    }
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Rows in plan order
    pub steps: Vec<StepView>,
    /// Index of the current step, if any
    pub current: Option<usize>,
    /// Whether the brew parameters must be read-only
    ///
    /// True while the session is locked, and also while the final step is
    /// highlighted even if the session itself would allow edits.
    pub config_locked: bool,
    /// Whether the final highlight window has closed
    pub finished: bool,
}

impl Projection {
    /// The current row, if any.
    pub fn current_step(&self) -> Option<&StepView> {
        self.current.and_then(|index| self.steps.get(index))
    }

    /// Whether the final step is the highlighted one.
    pub fn is_draining(&self) -> bool {
        self.current_step().is_some_and(|step| step.is_final)
    }
}

/// Projects `plan` and `session` onto display rows at `now`.
///
/// A session that has not been started, or has not been sampled yet
/// (`now == None`), shows every wait at full length with no current step.
/// Otherwise each wait counts down while its window is open and shows zero
/// once it has closed.
pub fn project(
    plan: &BrewPlan,
    session: &BrewSession,
    now: Option<Timestamp>,
    timing: &TimingConfig,
) -> Projection {
    let sampled = session.started_at.zip(now);
    let Some((started_at, now)) = sampled else {
        return Projection {
            steps: plan
                .iter()
                .map(|step| StepView {
                    index: step.index,
                    target_amount: step.cumulative_target_amount,
                    remaining: step.wait_duration,
                    is_current: false,
                    is_final: step.is_final,
                })
                .collect(),
            current: None,
            config_locked: session.config_locked,
            finished: false,
        };
    };

    let timeline = Timeline::new(plan, started_at, timing.highlight_window);
    let position = timeline.position(now);
    let current = position.current_step();

    let steps = plan
        .iter()
        .zip(timeline.windows())
        .map(|(step, window)| StepView {
            index: step.index,
            target_amount: step.cumulative_target_amount,
            remaining: step.wait_duration.map(|_| window.remaining_at(now)),
            is_current: current == Some(step.index),
            is_final: step.is_final,
        })
        .collect();

    Projection {
        steps,
        current,
        config_locked: session.config_locked || matches!(position, Position::Draining(_)),
        finished: matches!(position, Position::Finished),
    }
}
