//! Roast profiles and their step sequences.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::StepKind;

/// Type-safe enumeration of roast profiles.
///
/// Each roast carries a water-amount adjustment factor and an ordered
/// sequence of [`StepKind`]s. The table is fixed at compile time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Roast {
    /// Medium roast: one short pour followed by two long pours
    Medium,

    /// Dark roast: four short pours
    #[default]
    Dark,
}

const MEDIUM_STEPS: [StepKind; 3] = [StepKind::SHORT, StepKind::LONG, StepKind::LONG];
const DARK_STEPS: [StepKind; 4] = [
    StepKind::SHORT,
    StepKind::SHORT,
    StepKind::SHORT,
    StepKind::SHORT,
];

impl Roast {
    /// Every roast, in menu order.
    pub const ALL: [Roast; 2] = [Roast::Medium, Roast::Dark];

    /// Ordered step kinds for this roast.
    pub fn steps(&self) -> &'static [StepKind] {
        match self {
            Roast::Medium => &MEDIUM_STEPS,
            Roast::Dark => &DARK_STEPS,
        }
    }

    /// Wait units from the first pour to the final one.
    ///
    /// The final step has no wait, so its factor is not counted.
    pub fn total_wait_factor(&self) -> u32 {
        let steps = self.steps();
        steps[..steps.len().saturating_sub(1)]
            .iter()
            .map(|kind| kind.wait_duration_factor)
            .sum()
    }

    /// Multiplier applied to the bean mass before computing water amounts.
    pub fn amount_adjustment(&self) -> f64 {
        match self {
            Roast::Medium => 0.8,
            Roast::Dark => 1.0,
        }
    }

    /// Lowercase name used on the command line and in saved state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Roast::Medium => "medium",
            Roast::Dark => "dark",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Roast::Medium => "Medium roast",
            Roast::Dark => "Dark roast",
        }
    }
}

impl FromStr for Roast {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medium" | "m" => Ok(Roast::Medium),
            "dark" | "d" => Ok(Roast::Dark),
            _ => Err(format!("Invalid roast: {s}")),
        }
    }
}

impl fmt::Display for Roast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
