//! Wall-clock timeline of a running brew.
//!
//! A started plan is laid out as back-to-back step windows. Step `i` opens at
//! `started_at + waits[0..i]` and stays open for its own wait; the final step
//! has no wait, so its window is the configured highlight window instead.
//!
//! ```text
//!  started_at
//!  │ step 0 wait │   step 1 wait   │ final highlight │
//!  ├─────────────┼─────────────────┼─────────────────┤
//!  [             )[                )[                )  finished
//! ```
//!
//! Windows are half-open, so an instant exactly on a boundary belongs to the
//! later step and at most one window contains any instant.

use jiff::{SignedDuration, Timestamp};

use crate::{clock::saturating_offset, models::BrewPlan};

/// Time span during which one step is the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepWindow {
    /// Step index within the plan
    pub index: usize,
    /// Instant the step becomes current
    pub opens_at: Timestamp,
    /// Wait duration, or the highlight window for the final step
    pub length: SignedDuration,
    /// Whether this is the plan's final step
    pub is_final: bool,
}

impl StepWindow {
    /// Instant the step stops being current, at most `Timestamp::MAX`.
    pub fn closes_at(&self) -> Timestamp {
        saturating_offset(self.opens_at, self.length)
    }

    /// Whether `now` falls inside `[opens_at, closes_at)`.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.opens_at <= now && now < self.closes_at()
    }

    /// Time left in this window at `now`.
    ///
    /// The full length before the window opens, the time to `closes_at`
    /// while open, and zero afterwards.
    pub fn remaining_at(&self, now: Timestamp) -> SignedDuration {
        if now < self.opens_at {
            self.length
        } else if now < self.closes_at() {
            self.closes_at().duration_since(now)
        } else {
            SignedDuration::ZERO
        }
    }
}

/// Where a brew stands at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The instant precedes the start (clock moved backwards)
    NotStarted,
    /// A non-final step is current
    Pouring(usize),
    /// The final step's highlight window is open
    Draining(usize),
    /// Every window has closed
    Finished,
}

impl Position {
    /// Index of the current step, if any.
    pub fn current_step(&self) -> Option<usize> {
        match self {
            Position::Pouring(index) | Position::Draining(index) => Some(*index),
            Position::NotStarted | Position::Finished => None,
        }
    }
}

/// Step windows of a plan anchored at a start instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    started_at: Timestamp,
    windows: Vec<StepWindow>,
}

impl Timeline {
    /// Lays out the plan's steps from `started_at`.
    pub fn new(plan: &BrewPlan, started_at: Timestamp, highlight_window: SignedDuration) -> Self {
        let mut opens_at = started_at;
        let windows = plan
            .iter()
            .map(|step| {
                let length = step.wait_duration.unwrap_or(highlight_window);
                let window = StepWindow {
                    index: step.index,
                    opens_at,
                    length,
                    is_final: step.is_final,
                };
                opens_at = window.closes_at();
                window
            })
            .collect();

        Self {
            started_at,
            windows,
        }
    }

    /// Start instant the timeline is anchored at.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// All windows in step order.
    pub fn windows(&self) -> &[StepWindow] {
        &self.windows
    }

    /// Window of the step at `index`.
    pub fn window(&self, index: usize) -> Option<&StepWindow> {
        self.windows.get(index)
    }

    /// Instant the final highlight window closes.
    pub fn ends_at(&self) -> Timestamp {
        self.windows
            .last()
            .map_or(self.started_at, StepWindow::closes_at)
    }

    /// Position of the brew at `now`.
    pub fn position(&self, now: Timestamp) -> Position {
        if now < self.started_at {
            return Position::NotStarted;
        }
        match self.windows.iter().find(|w| w.contains(now)) {
            Some(window) if window.is_final => Position::Draining(window.index),
            Some(window) => Position::Pouring(window.index),
            None => Position::Finished,
        }
    }

    /// Index of the single step whose window contains `now`.
    pub fn current_step(&self, now: Timestamp) -> Option<usize> {
        self.position(now).current_step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Roast;

    fn start() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn at(ms: i64) -> Timestamp {
        start() + SignedDuration::from_millis(ms)
    }

    fn medium_timeline() -> Timeline {
        let plan = BrewPlan::build("20", Roast::Medium);
        Timeline::new(&plan, start(), SignedDuration::from_secs(30))
    }

    #[test]
    fn test_windows_are_back_to_back() {
        let timeline = medium_timeline();
        let windows = timeline.windows();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].opens_at, start());
        assert_eq!(windows[1].opens_at, at(120_000));
        assert_eq!(windows[2].opens_at, at(300_000));
        assert_eq!(windows[2].length, SignedDuration::from_secs(30));
        assert_eq!(timeline.ends_at(), at(330_000));
    }

    #[test]
    fn test_position_mid_brew() {
        let timeline = medium_timeline();

        assert_eq!(timeline.position(at(0)), Position::Pouring(0));
        assert_eq!(timeline.position(at(150_000)), Position::Pouring(1));
        assert_eq!(timeline.position(at(300_000)), Position::Draining(2));
        assert_eq!(timeline.position(at(330_000)), Position::Finished);
        assert_eq!(timeline.position(at(-1)), Position::NotStarted);
    }

    #[test]
    fn test_boundary_belongs_to_later_step() {
        let plan = BrewPlan::build("10", Roast::Dark);
        let timeline = Timeline::new(&plan, start(), SignedDuration::from_secs(30));

        assert_eq!(timeline.current_step(at(119_999)), Some(0));
        assert_eq!(timeline.current_step(at(120_000)), Some(1));
        assert_eq!(
            timeline.window(0).unwrap().remaining_at(at(119_999)),
            SignedDuration::from_millis(1)
        );
        assert_eq!(
            timeline.window(0).unwrap().remaining_at(at(120_000)),
            SignedDuration::ZERO
        );
    }

    #[test]
    fn test_remaining_before_during_after() {
        let timeline = medium_timeline();
        let step1 = timeline.window(1).unwrap();

        assert_eq!(step1.remaining_at(at(60_000)), SignedDuration::from_secs(180));
        assert_eq!(step1.remaining_at(at(150_000)), SignedDuration::from_secs(150));
        assert_eq!(step1.remaining_at(at(270_000)), SignedDuration::from_secs(30));
        assert_eq!(step1.remaining_at(at(400_000)), SignedDuration::ZERO);
    }

    #[test]
    fn test_zero_highlight_window_finishes_at_last_boundary() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let timeline = Timeline::new(&plan, start(), SignedDuration::ZERO);

        assert_eq!(timeline.position(at(299_999)), Position::Pouring(1));
        assert_eq!(timeline.position(at(300_000)), Position::Finished);
    }

    #[test]
    fn test_windows_clamp_at_the_end_of_time() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let late = Timestamp::MAX - SignedDuration::from_secs(60);
        let timeline = Timeline::new(&plan, late, SignedDuration::from_secs(30));

        assert_eq!(timeline.window(0).unwrap().closes_at(), Timestamp::MAX);
        assert_eq!(timeline.window(2).unwrap().opens_at, Timestamp::MAX);
        assert_eq!(timeline.ends_at(), Timestamp::MAX);
        assert_eq!(timeline.position(late), Position::Pouring(0));
        assert_eq!(
            timeline.window(0).unwrap().remaining_at(late),
            SignedDuration::from_secs(60)
        );
        assert_eq!(timeline.position(Timestamp::MAX), Position::Finished);
    }
}
