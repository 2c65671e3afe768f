//! Reporting date windows.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest window a single report may cover.
pub const MAX_WINDOW_DAYS: u64 = 731;

/// Errors building a [`DateWindow`] from request parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateWindowError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unknown range preset '{0}', expected 7d, 30d, 90d or ytd")]
    UnknownPreset(String),
    #[error("start date must be before end date")]
    Empty,
    #[error("date window cannot exceed {MAX_WINDOW_DAYS} days")]
    TooLong,
    #[error("both start and end dates are required for a custom range")]
    IncompleteRange,
}

/// A half-open UTC time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Build a window covering whole days `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns [`DateWindowError::Empty`] when `last` precedes `first` and
    /// [`DateWindowError::TooLong`] past [`MAX_WINDOW_DAYS`].
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Result<Self, DateWindowError> {
        if last < first {
            return Err(DateWindowError::Empty);
        }
        let end_day = last
            .checked_add_days(Days::new(1))
            .ok_or(DateWindowError::TooLong)?;
        let span = u64::try_from((end_day - first).num_days()).unwrap_or(u64::MAX);
        if span > MAX_WINDOW_DAYS {
            return Err(DateWindowError::TooLong);
        }
        Ok(Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: end_day.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    /// Window ending today (inclusive) and covering `days` days.
    ///
    /// # Errors
    ///
    /// Same as [`DateWindow::from_days`].
    pub fn last_days(today: NaiveDate, days: u64) -> Result<Self, DateWindowError> {
        let first = today
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .ok_or(DateWindowError::TooLong)?;
        Self::from_days(first, today)
    }

    /// Resolve query parameters into a window.
    ///
    /// Explicit `start`/`end` dates (inclusive) win over `range`; with neither,
    /// the last 30 days are used.
    ///
    /// # Errors
    ///
    /// Returns a [`DateWindowError`] for malformed dates, unknown presets,
    /// half-specified custom ranges and empty or oversized windows.
    pub fn from_query(
        range: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DateWindowError> {
        match (non_blank(start), non_blank(end)) {
            (Some(start), Some(end)) => Self::from_days(parse_date(start)?, parse_date(end)?),
            (None, None) => match non_blank(range).unwrap_or("30d") {
                "7d" => Self::last_days(today, 7),
                "30d" => Self::last_days(today, 30),
                "90d" => Self::last_days(today, 90),
                "ytd" => {
                    let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                        .ok_or_else(|| DateWindowError::InvalidDate(today.to_string()))?;
                    Self::from_days(jan_first, today)
                }
                other => Err(DateWindowError::UnknownPreset(other.to_owned())),
            },
            _ => Err(DateWindowError::IncompleteRange),
        }
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// First day of the window.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Last day of the window (inclusive).
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        (self.end - chrono::Duration::nanoseconds(1)).date_naive()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, DateWindowError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DateWindowError::InvalidDate(value.to_owned()))
}
