//! Data models for roasts, plans and sessions.
//!
//! This module contains the core domain models of the drip timer. Display
//! implementations for these models live in [`crate::display`] to keep
//! presentation apart from the data.
//!
//! ## Models
//!
//! - [`Roast`]: fixed table of roast profiles, each with an amount adjustment
//!   and an ordered list of [`StepKind`]s
//! - [`BrewPlan`]: the concrete pours for one (bean mass, roast) pair, made of
//!   [`PlanStep`]s with cumulative water targets and waits
//! - [`BrewSession`]: the runtime record of the single brew, plus
//!   [`SessionState`] for its lifecycle
//! - [`SessionSnapshot`]: what survives a process restart
//!
//! # Examples
//!
//! ```rust
//! use drip_core::models::{BrewPlan, Roast};
//!
//! let plan = BrewPlan::build("20", Roast::Medium);
//! let amounts: Vec<f64> = plan.iter().map(|s| s.cumulative_target_amount).collect();
//! assert_eq!(amounts, vec![80.0, 200.0, 320.0]);
//! assert!(plan[2].is_final);
//! assert!(plan[2].wait_duration.is_none());
//! ```

pub mod plan;
pub mod roast;
pub mod session;
pub mod status;
pub mod step;

#[cfg(test)]
mod tests;

pub use plan::{BrewPlan, DEFAULT_WAIT_UNIT};
pub use roast::Roast;
pub use session::{BrewSession, SessionSnapshot};
pub use status::SessionState;
pub use step::{PlanStep, StepKind};
