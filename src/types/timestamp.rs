use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp(millis)
    }

    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Renders the instant in the report's display timezone,
    /// e.g. `17/10/2026, 3:04:05 pm`.
    pub fn to_display(&self, offset: FixedOffset) -> String {
        match DateTime::from_timestamp_millis(self.0) {
            Some(utc) => utc
                .with_timezone(&offset)
                .format("%d/%m/%Y, %-I:%M:%S %P")
                .to_string(),
            None => self.0.to_string(),
        }
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(duration.as_millis() as i64))
    }
}

impl std::ops::Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_sub(duration.as_millis() as i64))
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    /// Elapsed time from `other` to `self`; zero if `other` is later.
    fn sub(self, other: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(other.0).max(0) as u64)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_in_singapore_time() {
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        // 2024-01-01T07:30:00Z
        let ts = Timestamp::from_millis(1_704_094_200_000);
        assert_eq!(ts.to_display(sgt), "01/01/2024, 3:30:00 pm");
    }

    #[test]
    fn difference_saturates_at_zero() {
        let a = Timestamp::from_millis(1_000);
        let b = Timestamp::from_millis(4_000);
        assert_eq!(b - a, Duration::from_secs(3));
        assert_eq!(a - b, Duration::ZERO);
    }
}
