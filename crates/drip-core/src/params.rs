//! Brew parameters shared by every front-end.
//!
//! These structures carry the user's inputs (bean mass text and roast) between
//! the interface layer and the timing engine without any framework-specific
//! derives. Interface layers wrap them with their own argument types and
//! convert via `From`.
//!
//! Bean mass is kept as the raw text the user typed. The input boundary only
//! admits text of the form `digits? ("." digits?)?`; anything else is rejected
//! and the previous value is kept. Partial input such as `""` or `"."` is
//! accepted and counts as zero grams.

use serde::{Deserialize, Serialize};

use crate::models::Roast;

/// Bean mass used when nothing has been entered yet.
pub const DEFAULT_BEAN_MASS: &str = "10";

/// User-supplied brew parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewParams {
    /// Bean mass in grams, as typed
    pub bean_mass: String,
    /// Roast profile
    pub roast: Roast,
}

impl BrewParams {
    /// Creates parameters, falling back to the default mass when the text is
    /// not acceptable input.
    pub fn new(bean_mass: impl Into<String>, roast: Roast) -> Self {
        let mut params = Self {
            roast,
            ..Self::default()
        };
        params.set_bean_mass(bean_mass);
        params
    }

    /// Replaces the bean mass if the text is acceptable input.
    ///
    /// Returns `false` and keeps the last valid value otherwise.
    pub fn set_bean_mass(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if is_bean_mass_input(&text) {
            self.bean_mass = text;
            true
        } else {
            false
        }
    }

    /// Parsed bean mass in grams.
    pub fn bean_mass_grams(&self) -> f64 {
        parse_bean_mass(&self.bean_mass)
    }
}

impl Default for BrewParams {
    fn default() -> Self {
        Self {
            bean_mass: DEFAULT_BEAN_MASS.to_string(),
            roast: Roast::default(),
        }
    }
}

/// Whether the text matches `digits? ("." digits?)?`.
pub fn is_bean_mass_input(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    whole.bytes().all(|b| b.is_ascii_digit()) && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Parses bean mass text into grams.
///
/// Empty, partial (`"."`) or otherwise unparsable text is zero; this never
/// fails.
pub fn parse_bean_mass(text: &str) -> f64 {
    if !is_bean_mass_input(text) {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(0.0)
}
