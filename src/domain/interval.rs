//! Validated timer interval.

use std::fmt;
use std::time::Duration;

use crate::error::GatewayError;

/// Upper bound applied when no explicit maximum is configured (24 hours).
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 86_400_000;

/// Cadence of a timer subscription.
///
/// Always strictly positive and never above the configured maximum, so a
/// timer built from it can schedule its next tick without overflowing the
/// monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(Duration);

impl Interval {
    /// Validates a client-supplied interval in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInterval`] if `millis` is zero,
    /// negative, or greater than `max_millis`.
    pub fn from_millis(millis: i64, max_millis: u64) -> Result<Self, GatewayError> {
        match u64::try_from(millis) {
            Ok(ms) if ms > 0 && ms <= max_millis => Ok(Self(Duration::from_millis(ms))),
            _ => Err(GatewayError::InvalidInterval(millis.to_string())),
        }
    }

    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Returns the interval in whole milliseconds.
    #[must_use]
    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_interval() {
        let Ok(interval) = Interval::from_millis(1000, DEFAULT_MAX_INTERVAL_MS) else {
            panic!("1000ms should be valid");
        };
        assert_eq!(interval.as_duration(), Duration::from_secs(1));
        assert_eq!(interval.as_millis(), 1000);
        assert_eq!(interval.to_string(), "1000ms");
    }

    #[test]
    fn rejects_zero() {
        let result = Interval::from_millis(0, DEFAULT_MAX_INTERVAL_MS);
        assert!(matches!(result, Err(GatewayError::InvalidInterval(_))));
    }

    #[test]
    fn rejects_negative() {
        let result = Interval::from_millis(-250, DEFAULT_MAX_INTERVAL_MS);
        assert!(matches!(result, Err(GatewayError::InvalidInterval(_))));
    }

    #[test]
    fn rejects_above_maximum() {
        assert!(Interval::from_millis(5_000, 5_000).is_ok());
        assert!(Interval::from_millis(5_001, 5_000).is_err());
    }
}
