//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` that shows the wall-clock time of day in the
/// system timezone.
///
/// The display format follows the pattern `HH:MM:SS TZ` in 24-hour time,
/// e.g. `07:42:10 CET`. A brew never spans days, so the date is left out.
pub struct LocalTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%H:%M:%S %Z")
        )
    }
}
