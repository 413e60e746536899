//! Lifecycle states of a brew session.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of session states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No brew in progress
    #[default]
    Idle,

    /// Pouring and waiting through the plan
    Running,

    /// Last pour done, final highlight window still open
    Completing,
}

impl FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SessionState::Idle),
            "running" => Ok(SessionState::Running),
            "completing" => Ok(SessionState::Completing),
            _ => Err(format!("Invalid session state: {s}")),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionState {
    /// Lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Completing => "completing",
        }
    }

    /// Whether a brew has been started and not yet cancelled.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Get state with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use drip_core::models::SessionState;
    ///
    /// assert_eq!(SessionState::Idle.with_icon(), "○ Idle");
    /// assert_eq!(SessionState::Running.with_icon(), "➤ Brewing");
    /// assert_eq!(SessionState::Completing.with_icon(), "✓ Draining");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            SessionState::Idle => "○ Idle",
            SessionState::Running => "➤ Brewing",
            SessionState::Completing => "✓ Draining",
        }
    }
}
