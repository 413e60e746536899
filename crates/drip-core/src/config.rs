//! Timing configuration for the engine, projector and ticker.

use jiff::SignedDuration;

use crate::{
    error::{BrewError, Result},
    models::{Roast, DEFAULT_WAIT_UNIT},
};

/// How long the final step stays highlighted after the last wait elapses.
pub const DEFAULT_HIGHLIGHT_WINDOW: SignedDuration = SignedDuration::from_secs(30);

/// Period of the display clock resample.
pub const DEFAULT_TICK_PERIOD: SignedDuration = SignedDuration::from_secs(1);

/// Longest brew a configuration may produce, from the first pour to the end
/// of the final highlight.
pub const MAX_BREW_SPAN: SignedDuration = SignedDuration::from_secs(24 * 60 * 60);

/// Durations that shape a brew's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Length of one wait factor
    pub wait_unit: SignedDuration,
    /// Highlight window of the final step
    pub highlight_window: SignedDuration,
    /// Clock resample period while a brew runs
    pub tick_period: SignedDuration,
}

impl TimingConfig {
    /// Checks that every duration is usable.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::Configuration` if the wait unit or tick period is
    /// not positive, the highlight window is negative, or the longest roast
    /// would run past [`MAX_BREW_SPAN`].
    pub fn validate(&self) -> Result<()> {
        if !self.wait_unit.is_positive() {
            return Err(BrewError::configuration(format!(
                "wait unit must be positive, got {:?}",
                self.wait_unit
            )));
        }
        if self.highlight_window.is_negative() {
            return Err(BrewError::configuration(format!(
                "highlight window must not be negative, got {:?}",
                self.highlight_window
            )));
        }
        let span = self.longest_brew_millis();
        if span > MAX_BREW_SPAN.as_millis() {
            return Err(BrewError::configuration(format!(
                "wait unit {:?} and highlight window {:?} give a {} ms brew, longer than {:?}",
                self.wait_unit, self.highlight_window, span, MAX_BREW_SPAN
            )));
        }
        if !self.tick_period.is_positive() {
            return Err(BrewError::configuration(format!(
                "tick period must be positive, got {:?}",
                self.tick_period
            )));
        }
        Ok(())
    }

    /// Length of the longest roast's brew in milliseconds, highlight included.
    fn longest_brew_millis(&self) -> i128 {
        let factor = Roast::ALL
            .iter()
            .map(Roast::total_wait_factor)
            .max()
            .unwrap_or(0);
        self.wait_unit
            .as_millis()
            .saturating_mul(i128::from(factor))
            .saturating_add(self.highlight_window.as_millis())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_unit: DEFAULT_WAIT_UNIT,
            highlight_window: DEFAULT_HIGHLIGHT_WINDOW,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}
