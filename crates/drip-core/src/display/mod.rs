//! Display projection and formatting.
//!
//! The UI never reads the timing engine's internals. It asks for a
//! [`Projection`] (a pure function of plan, session and the sampled instant)
//! and formats it through the wrappers in this module.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ BrewPlan +      │    │   project()     │    │   Formatted     │
//! │ BrewSession +   │───▶│  (Projection,   │───▶│    Output       │
//! │ sampled instant │    │   StepView)     │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`projector`]: the pure projection and its row types
//! - [`units`]: `Grams` and `Countdown` formatting wrappers
//! - [`views`]: markdown `Display` for projections, headers and totals
//! - [`datetime`]: time-of-day formatting
//!
//! ## Usage Examples
//!
//! ```rust
//! use drip_core::{
//!     config::TimingConfig,
//!     display::project,
//!     models::{BrewPlan, BrewSession, Roast},
//! };
//! use jiff::{SignedDuration, Timestamp};
//!
//! let plan = BrewPlan::build("20", Roast::Medium);
//! let start = Timestamp::from_second(1_700_000_000).unwrap();
//! let session = BrewSession::started(start);
//! let now = start + SignedDuration::from_secs(150);
//!
//! let projection = project(&plan, &session, Some(now), &TimingConfig::default());
//! assert_eq!(projection.current, Some(1));
//! assert_eq!(
//!     projection.steps[1].remaining_display().unwrap().to_string(),
//!     "2:30"
//! );
//! ```

pub mod datetime;
pub mod projector;
pub mod units;
pub mod views;


pub use datetime::LocalTime;
pub use projector::{project, Projection, StepView};
pub use units::{Countdown, Grams};
pub use views::{BrewHeader, CurrentStep, PlanTotals};
