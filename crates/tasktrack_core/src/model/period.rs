//! Half-open date interval used as the statistics window.
//!
//! # Invariants
//! - `start <= end` for every constructed `Period`.
//! - A day `d` is inside the period iff `start <= d < end`.
//! - `start == end` is a valid, empty period.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error for malformed period boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    /// `start` is after `end`; upstream boundary computation is broken.
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    /// Boundary arithmetic left the supported calendar range.
    OutOfRange(NaiveDate),
}

impl Display for PeriodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPeriod { start, end } => {
                write!(f, "invalid period: start {start} is after end {end}")
            }
            Self::OutOfRange(date) => write!(f, "period boundary out of range near {date}"),
        }
    }
}

impl Error for PeriodError {}

/// Closed-open calendar interval `[start, end)`.
///
/// Not `Deserialize`: every instance goes through `Period::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Creates a period, rejecting reversed boundaries.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive first day.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive last day.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the period.
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Lazily enumerates every day in ascending order.
    ///
    /// `Period` is `Copy`; call again to restart the sequence.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        self.start.iter_days().take(self.len_days())
    }
}

/// Named calendar windows resolved relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPreset {
    /// The reference day only.
    Today,
    /// ISO week (Monday through Sunday) containing the reference day.
    Week,
    /// Calendar month containing the reference day.
    Month,
    /// Calendar year containing the reference day.
    Year,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 4] = [Self::Today, Self::Week, Self::Month, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Resolves the preset into a concrete period containing `today`.
    ///
    /// # Errors
    /// - `PeriodError::OutOfRange` only at the edges of chrono's date range.
    pub fn period_for(self, today: NaiveDate) -> Result<Period, PeriodError> {
        let (start, end) = match self {
            Self::Today => (today, add_days(today, 1)?),
            Self::Week => {
                // Shift back to Monday: (days_from_sunday + 6) % 7.
                let back = (today.weekday().num_days_from_sunday() + 6) % 7;
                let start = today
                    .checked_sub_days(Days::new(u64::from(back)))
                    .ok_or(PeriodError::OutOfRange(today))?;
                (start, add_days(start, 7)?)
            }
            Self::Month => {
                let start = today.with_day(1).ok_or(PeriodError::OutOfRange(today))?;
                let end = start
                    .checked_add_months(Months::new(1))
                    .ok_or(PeriodError::OutOfRange(start))?;
                (start, end)
            }
            Self::Year => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                    .ok_or(PeriodError::OutOfRange(today))?;
                let end = start
                    .checked_add_months(Months::new(12))
                    .ok_or(PeriodError::OutOfRange(start))?;
                (start, end)
            }
        };
        Period::new(start, end)
    }
}

impl Display for PeriodPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "unsupported period `{other}`; expected today|week|month|year"
            )),
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_add_days(Days::new(days))
        .ok_or(PeriodError::OutOfRange(date))
}
