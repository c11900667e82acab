//! Monthly usage period value object.
//!
//! Invoice quotas are evaluated per calendar month; usage counters are
//! keyed by a `"YYYY-MM"` period string.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Timestamp, ValidationError};

/// Calendar-month key for usage counters (e.g. `"2025-03"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsagePeriod(String);

impl UsagePeriod {
    /// Period containing the given timestamp.
    pub fn containing(ts: &Timestamp) -> Self {
        let dt = ts.as_datetime();
        Self(format!("{:04}-{:02}", dt.year(), dt.month()))
    }

    /// Period containing the current moment.
    pub fn current() -> Self {
        Self::containing(&Timestamp::now())
    }

    /// Parses a `"YYYY-MM"` string, rejecting malformed values.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let valid = s.len() == 7
            && s.as_bytes()[4] == b'-'
            && s[..4].chars().all(|c| c.is_ascii_digit())
            && s[5..]
                .parse::<u8>()
                .map(|m| (1..=12).contains(&m))
                .unwrap_or(false);

        if !valid {
            return Err(ValidationError::invalid_format(
                "usage_period",
                "expected YYYY-MM",
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UsagePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
