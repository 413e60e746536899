//! Step kinds and concrete plan steps.

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

/// A reusable (water amount, wait duration) pair.
///
/// The water factor is grams of water per gram of effective bean mass; the
/// wait factor is a multiple of the configured wait unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepKind {
    /// Water poured in this step per gram of effective bean mass
    pub water_amount_factor: f64,

    /// Wait after this step, in wait units
    pub wait_duration_factor: u32,
}

impl StepKind {
    /// Short pour, two units of wait.
    pub const SHORT: StepKind = StepKind {
        water_amount_factor: 5.0,
        wait_duration_factor: 2,
    };

    /// Long pour, three units of wait.
    pub const LONG: StepKind = StepKind {
        water_amount_factor: 7.5,
        wait_duration_factor: 3,
    };
}

/// One step of a concrete brew plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanStep {
    /// Position of the step within the plan (0-indexed)
    pub index: usize,

    /// Total water in the dripper once this step's pour is done
    pub cumulative_target_amount: f64,

    /// Wait after this pour; `None` for the final step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_duration: Option<SignedDuration>,

    /// Whether this is the last pour of the plan
    pub is_final: bool,
}

impl PlanStep {
    /// Wait after this step, zero for the final step.
    pub fn wait_or_zero(&self) -> SignedDuration {
        self.wait_duration.unwrap_or(SignedDuration::ZERO)
    }
}
