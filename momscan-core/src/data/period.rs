//! Lookback period descriptors ("6mo", "1y", "ytd", ...).
//!
//! Uses the same vocabulary as Yahoo's chart `range` parameter so a period
//! can be passed through to the provider unchanged.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid lookback period '{0}' (expected e.g. 5d, 2wk, 6mo, 1y, ytd, max)")]
    Invalid(String),
}

/// How far back to retrieve history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl LookbackPeriod {
    /// First date covered when the period ends on `end` (inclusive).
    /// `Max` has no lower bound.
    pub fn start_from(&self, end: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Self::Days(n) => end.checked_sub_days(Days::new(u64::from(n))),
            Self::Weeks(n) => end.checked_sub_days(Days::new(7 * u64::from(n))),
            Self::Months(n) => end.checked_sub_months(Months::new(n)),
            Self::Years(n) => end.checked_sub_months(Months::new(n.saturating_mul(12))),
            Self::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            Self::Max => None,
        }
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        Self::Months(6)
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{n}d"),
            Self::Weeks(n) => write!(f, "{n}wk"),
            Self::Months(n) => write!(f, "{n}mo"),
            Self::Years(n) => write!(f, "{n}y"),
            Self::YearToDate => f.write_str("ytd"),
            Self::Max => f.write_str("max"),
        }
    }
}

impl FromStr for LookbackPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ytd" => return Ok(Self::YearToDate),
            "max" => return Ok(Self::Max),
            _ => {}
        }

        let split = lower
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| PeriodError::Invalid(s.to_string()))?;
        let (digits, unit) = lower.split_at(split);
        let n: u32 = digits
            .parse()
            .map_err(|_| PeriodError::Invalid(s.to_string()))?;
        if n == 0 {
            return Err(PeriodError::Invalid(s.to_string()));
        }

        match unit {
            "d" => Ok(Self::Days(n)),
            "wk" | "w" => Ok(Self::Weeks(n)),
            "mo" | "m" => Ok(Self::Months(n)),
            "y" => Ok(Self::Years(n)),
            _ => Err(PeriodError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(value: LookbackPeriod) -> Self {
        value.to_string()
    }
}
