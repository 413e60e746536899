//! Brew plan model and builder.

use std::{ops::Index, slice};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use super::{PlanStep, Roast};
use crate::{
    clock::saturating_offset,
    params::{parse_bean_mass, BrewParams},
};

/// Default wait unit: one minute per wait factor.
pub const DEFAULT_WAIT_UNIT: SignedDuration = SignedDuration::from_secs(60);

/// Ordered sequence of pours derived from a bean mass and a roast.
///
/// A plan always has at least one step. Cumulative amounts never decrease
/// and only the final step lacks a wait duration. Plans are immutable; any
/// parameter change produces a new plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrewPlan {
    roast: Roast,
    effective_mass: f64,
    steps: Vec<PlanStep>,
}

impl BrewPlan {
    /// Builds the plan for the given bean mass text with the default wait
    /// unit.
    pub fn build(bean_mass_text: &str, roast: Roast) -> Self {
        Self::build_with_unit(bean_mass_text, roast, DEFAULT_WAIT_UNIT)
    }

    /// Builds the plan for user parameters.
    pub fn from_params(params: &BrewParams, wait_unit: SignedDuration) -> Self {
        Self::build_with_unit(&params.bean_mass, params.roast, wait_unit)
    }

    /// Builds the plan with an explicit wait unit.
    ///
    /// Unparsable or partial mass text counts as zero grams, which yields a
    /// valid plan with all amounts at zero.
    pub fn build_with_unit(bean_mass_text: &str, roast: Roast, wait_unit: SignedDuration) -> Self {
        let effective_mass = parse_bean_mass(bean_mass_text) * roast.amount_adjustment();
        let kinds = roast.steps();
        let last = kinds.len() - 1;
        let unit_ms = i64::try_from(wait_unit.as_millis()).unwrap_or(i64::MAX);

        let mut cumulative = 0.0;
        let steps = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                cumulative += kind.water_amount_factor * effective_mass;
                let is_final = index == last;
                let wait_duration = (!is_final).then(|| {
                    SignedDuration::from_millis(
                        unit_ms.saturating_mul(i64::from(kind.wait_duration_factor)),
                    )
                });
                PlanStep {
                    index,
                    cumulative_target_amount: cumulative,
                    wait_duration,
                    is_final,
                }
            })
            .collect();

        Self {
            roast,
            effective_mass,
            steps,
        }
    }

    /// Roast the plan was built for.
    pub fn roast(&self) -> Roast {
        self.roast
    }

    /// Bean mass after the roast adjustment.
    pub fn effective_mass(&self) -> f64 {
        self.effective_mass
    }

    /// All steps in pour order.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Number of steps; never zero.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; plans have at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step, which is also the highest alarm key.
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Get a reference to the step at the given index.
    pub fn get(&self, index: usize) -> Option<&PlanStep> {
        self.steps.get(index)
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> slice::Iter<'_, PlanStep> {
        self.steps.iter()
    }

    /// Sum of the waits of every step before `index`.
    pub fn wait_before(&self, index: usize) -> SignedDuration {
        self.steps[..index.min(self.steps.len())]
            .iter()
            .fold(SignedDuration::ZERO, |total, step| {
                total.saturating_add(step.wait_or_zero())
            })
    }

    /// Sum of every wait in the plan.
    pub fn total_wait(&self) -> SignedDuration {
        self.wait_before(self.steps.len())
    }

    /// Instant at which the step at `index` starts for a brew started at
    /// `started_at`. Clamps to `Timestamp::MAX` rather than overflowing.
    pub fn step_starts_at(&self, started_at: Timestamp, index: usize) -> Timestamp {
        saturating_offset(started_at, self.wait_before(index))
    }
}

impl Index<usize> for BrewPlan {
    type Output = PlanStep;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a BrewPlan {
    type Item = &'a PlanStep;
    type IntoIter = slice::Iter<'a, PlanStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
