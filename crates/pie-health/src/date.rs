//! Duration breakdown and timestamp display.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A millisecond count split into minutes, seconds and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DurationParts {
    /// Whole minutes (unbounded).
    pub minutes: u64,
    /// Remaining seconds, always below 60.
    pub seconds: u64,
    /// Remaining milliseconds, always below 1000.
    pub milliseconds: u64,
}

/// Split a millisecond count into minutes, seconds and milliseconds.
#[must_use]
pub const fn parse_milliseconds(milliseconds: u64) -> DurationParts {
    let total_seconds = milliseconds / 1000;
    DurationParts {
        minutes: total_seconds / 60,
        seconds: total_seconds % 60,
        milliseconds: milliseconds % 1000,
    }
}

impl fmt::Display for DurationParts {
    /// Compact form such as `1m 5s 20ms`; leading zero units are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes > 0 {
            write!(f, "{}m {}s {}ms", self.minutes, self.seconds, self.milliseconds)
        } else if self.seconds > 0 {
            write!(f, "{}s {}ms", self.seconds, self.milliseconds)
        } else {
            write!(f, "{}ms", self.milliseconds)
        }
    }
}

/// `HH:MM:SS` in UTC.
#[must_use]
pub fn format_status_time(dt: &DateTime<Utc>) -> String {
    dt.format("%H:%M:%S").to_string()
}
