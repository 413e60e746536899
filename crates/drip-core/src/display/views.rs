//! Markdown formatting for projections and brew headers.

use std::fmt;

use jiff::Timestamp;

use super::{Grams, LocalTime, Projection, StepView};
use crate::{
    models::{BrewPlan, SessionState},
    params::BrewParams,
};

impl StepView {
    fn icon(&self, current: Option<usize>, finished: bool) -> &'static str {
        match current {
            _ if finished => "✓",
            Some(index) if index == self.index => "➤",
            Some(index) if self.index < index => "✓",
            _ => "○",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            let icon = step.icon(self.current, self.finished);
            let amount = Grams(step.target_amount);
            let label = if step.is_current {
                format!("Pour to **{amount}**")
            } else {
                format!("Pour to {amount}")
            };
            match step.remaining_display() {
                Some(countdown) => {
                    writeln!(f, "{icon} {}. {label}, wait `{countdown}`", step.index + 1)?
                }
                None => writeln!(f, "{icon} {}. {label}, done", step.index + 1)?,
            }
        }
        Ok(())
    }
}

/// One-line countdown of the current step.
///
/// Writes nothing unless a step with a wait is current, so the final
/// highlight and idle brews produce an empty string.
pub struct CurrentStep<'a>(pub &'a Projection);

impl<'a> fmt::Display for CurrentStep<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(step) = self.0.current_step() else {
            return Ok(());
        };
        match step.remaining_display() {
            Some(countdown) => writeln!(
                f,
                "➤ {}. Pour to {}, `{countdown}` left",
                step.index + 1,
                Grams(step.target_amount)
            ),
            None => Ok(()),
        }
    }
}

/// Header describing the brew: parameters, state and start time.
///
/// # Examples
///
/// ```rust
/// use drip_core::{display::BrewHeader, models::{Roast, SessionState}, params::BrewParams};
///
/// let params = BrewParams::new("20", Roast::Medium);
/// let header = BrewHeader::new(&params, SessionState::Idle);
/// let output = header.to_string();
/// assert!(output.contains("# Medium roast, 20 g beans"));
/// assert!(output.contains("○ Idle"));
/// ```
pub struct BrewHeader<'a> {
    params: &'a BrewParams,
    state: SessionState,
    started_at: Option<Timestamp>,
}

impl<'a> BrewHeader<'a> {
    /// Header for a brew in the given state.
    pub fn new(params: &'a BrewParams, state: SessionState) -> Self {
        Self {
            params,
            state,
            started_at: None,
        }
    }

    /// Adds the start instant.
    pub fn started_at(mut self, started_at: Option<Timestamp>) -> Self {
        self.started_at = started_at;
        self
    }
}

impl<'a> fmt::Display for BrewHeader<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {}, {} beans",
            self.params.roast.label(),
            Grams(self.params.bean_mass_grams())
        )?;
        writeln!(f)?;
        write!(f, "**State:** {}", self.state.with_icon())?;
        if let Some(started_at) = &self.started_at {
            write!(f, " since {}", LocalTime(started_at))?;
        }
        writeln!(f)?;
        writeln!(f)
    }
}

/// Plan summary line: total water and total time.
pub struct PlanTotals<'a>(pub &'a BrewPlan);

impl<'a> fmt::Display for PlanTotals<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self
            .0
            .steps()
            .last()
            .map_or(0.0, |step| step.cumulative_target_amount);
        writeln!(
            f,
            "Total: {} of water over {} steps, {} of waiting",
            Grams(total),
            self.0.len(),
            super::Countdown(self.0.total_wait())
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::{
        config::TimingConfig,
        display::project,
        models::{BrewSession, Roast},
    };

    #[test]
    fn test_idle_projection_markdown() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let projection = project(&plan, &BrewSession::default(), None, &TimingConfig::default());
        let output = projection.to_string();

        assert_eq!(
            output,
            "○ 1. Pour to 80 g, wait `2:00`\n\
             ○ 2. Pour to 200 g, wait `3:00`\n\
             ○ 3. Pour to 320 g, done\n"
        );
    }

    #[test]
    fn test_running_projection_markdown() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let session = BrewSession::started(start);
        let now = start + SignedDuration::from_secs(270);
        let output = project(&plan, &session, Some(now), &TimingConfig::default()).to_string();

        assert!(output.contains("✓ 1. Pour to 80 g, wait `0:00`"));
        assert!(output.contains("➤ 2. Pour to **200 g**, wait `0:30`"));
        assert!(output.contains("○ 3. Pour to 320 g, done"));
    }

    #[test]
    fn test_current_step_line() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let session = BrewSession::started(start);
        let timing = TimingConfig::default();
        let at = |secs| {
            let now = start + SignedDuration::from_secs(secs);
            CurrentStep(&project(&plan, &session, Some(now), &timing)).to_string()
        };

        assert_eq!(at(270), "➤ 2. Pour to 200 g, `0:30` left\n");
        assert_eq!(at(271), "➤ 2. Pour to 200 g, `0:29` left\n");
        assert_eq!(at(305), "");

        let idle = project(&plan, &BrewSession::default(), None, &timing);
        assert_eq!(CurrentStep(&idle).to_string(), "");
    }

    #[test]
    fn test_plan_totals() {
        let plan = BrewPlan::build("10", Roast::Dark);
        assert_eq!(
            PlanTotals(&plan).to_string(),
            "Total: 200 g of water over 4 steps, 6:00 of waiting\n"
        );
    }
}
