//! Wrappers that format water amounts and countdowns.

use std::fmt;

use jiff::SignedDuration;

/// Water amount in grams.
///
/// Whole amounts print without decimals, others with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grams(pub f64);

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0} g", self.0)
        } else {
            write!(f, "{:.1} g", self.0)
        }
    }
}

/// Remaining time shown as `m:ss`.
///
/// Milliseconds are rounded half-up to whole seconds, so 29 500 ms shows as
/// `0:30` and 499 ms as `0:00`. Negative durations show as `0:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown(pub SignedDuration);

impl Countdown {
    /// Whole seconds after rounding.
    pub fn rounded_secs(&self) -> i64 {
        let millis = i64::try_from(self.0.as_millis()).unwrap_or(i64::MAX).max(0);
        millis.saturating_add(500) / 1000
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.rounded_secs();
        write!(f, "{}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(ms: i64) -> String {
        Countdown(SignedDuration::from_millis(ms)).to_string()
    }

    #[test]
    fn test_countdown_rounds_half_up() {
        assert_eq!(countdown(30_000), "0:30");
        assert_eq!(countdown(29_500), "0:30");
        assert_eq!(countdown(29_499), "0:29");
        assert_eq!(countdown(1), "0:00");
        assert_eq!(countdown(500), "0:01");
        assert_eq!(countdown(0), "0:00");
    }

    #[test]
    fn test_countdown_minutes() {
        assert_eq!(countdown(120_000), "2:00");
        assert_eq!(countdown(180_000), "3:00");
        assert_eq!(countdown(59_600), "1:00");
        assert_eq!(countdown(-5_000), "0:00");
    }

    #[test]
    fn test_grams() {
        assert_eq!(Grams(80.0).to_string(), "80 g");
        assert_eq!(Grams(0.0).to_string(), "0 g");
        assert_eq!(Grams(12.3).to_string(), "12.3 g");
        assert_eq!(Grams(13.6).to_string(), "13.6 g");
    }
}
