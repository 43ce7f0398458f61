//! Usage and quota types.
//!
//! - [`Period`] - Calendar month bucket scoping a usage counter
//! - [`UsageRecord`] - Persisted per-provider counter
//! - [`QuotaCheck`] - Read-only answer to "may I call this provider?"

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::provider::ProviderId;

// ============================================================================
// Period
// ============================================================================

/// A calendar year-month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, returning `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Returns the period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the following period.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the next period, i.e. when a counter for this period resets.
    pub fn resets_on(&self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid period '{s}', expected YYYY-MM"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in period '{s}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in period '{s}'"))?;
        Self::new(year, month).ok_or_else(|| format!("month out of range in period '{s}'"))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Usage Record
// ============================================================================

/// Monthly call counter for one metered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// The month this counter belongs to.
    pub period: Period,
    /// Successful calls recorded in `period`.
    pub count: u32,
    /// Maximum calls allowed in `period`.
    pub limit: u32,
}

impl UsageRecord {
    /// A zeroed record for a new period.
    pub fn fresh(period: Period, limit: u32) -> Self {
        Self {
            period,
            count: 0,
            limit,
        }
    }

    /// Calls left in this period.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    /// Returns true once no more calls are allowed.
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }

    /// Percentage of the budget consumed (0-100).
    pub fn used_percent(&self) -> f64 {
        if self.limit == 0 {
            return 100.0;
        }
        (f64::from(self.count) / f64::from(self.limit) * 100.0).min(100.0)
    }
}

// ============================================================================
// Quota Check
// ============================================================================

/// Result of a read-only quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaCheck {
    /// Provider checked.
    pub provider: ProviderId,
    /// Whether one more call is allowed.
    pub allowed: bool,
    /// Calls left in the period.
    pub remaining: u32,
    /// Calls used in the period.
    pub used: u32,
    /// Period budget.
    pub limit: u32,
    /// Active period.
    pub period: Period,
}

impl QuotaCheck {
    /// Builds a check from the current record.
    pub fn from_record(provider: ProviderId, record: &UsageRecord) -> Self {
        Self {
            provider,
            allowed: !record.is_exhausted(),
            remaining: record.remaining(),
            used: record.count,
            limit: record.limit,
            period: record.period,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
