//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording duration (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Value object for a recording length.
/// Immutable and never zero once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default recording duration (10 seconds)
    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration such as "500ms", "30s", "1m" or "2m30s".
    /// Units must appear in descending order and at most once each.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        // (unit, millis per unit), largest first
        const UNITS: [(&str, u64); 3] = [("m", 60_000), ("s", 1000), ("ms", 1)];

        let mut rest = input.as_str();
        let mut total_ms: u64 = 0;
        let mut next_unit = 0;

        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(err)?;
            if digits == 0 {
                return Err(err());
            }
            let value: u64 = rest[..digits].parse().map_err(|_| err())?;
            let after = &rest[digits..];

            // "ms" before "m"
            let (index, remainder) = [2, 0, 1]
                .into_iter()
                .find_map(|i| after.strip_prefix(UNITS[i].0).map(|r| (i, r)))
                .ok_or_else(err)?;
            if index < next_unit {
                return Err(err());
            }

            let part = value.checked_mul(UNITS[index].1).ok_or_else(err)?;
            total_ms = total_ms.checked_add(part).ok_or_else(err)?;
            next_unit = index + 1;
            rest = remainder;
        }

        if total_ms == 0 {
            return Err(err());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        let millis = self.milliseconds % 1000;

        if millis != 0 {
            return write!(f, "{}ms", self.milliseconds);
        }

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}
