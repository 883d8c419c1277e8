//! Recurrence rules and completion records attached to a task.
//!
//! # Invariants
//! - Rules are immutable once attached to a task and never deduplicated.
//! - Only the calendar date of a completion timestamp matters for statistics.
//! - A completion without a timestamp is carried but never counted.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a completion record.
pub type CompletionId = Uuid;

/// Recurrence kind. Weekly-by-day is the only kind today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// Fires on every occurrence of `day`.
    Weekly { day: Weekday },
}

impl Recurrence {
    /// Returns whether this recurrence fires on `date`.
    pub fn fires_on(&self, date: NaiveDate) -> bool {
        match self {
            Self::Weekly { day } => date.weekday() == *day,
        }
    }
}

/// One recurrence rule owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub recurrence: Recurrence,
    /// Opaque client options, carried verbatim.
    #[serde(default)]
    pub options: Option<String>,
}

impl RecurrenceRule {
    /// Weekly rule firing on `day`, without options.
    pub fn weekly(day: Weekday) -> Self {
        Self {
            recurrence: Recurrence::Weekly { day },
            options: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    pub fn fires_on(&self, date: NaiveDate) -> bool {
        self.recurrence.fires_on(date)
    }
}

/// Evidence that a task was marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: CompletionId,
    /// Local wall-clock time of completion, if recorded.
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl CompletionRecord {
    /// Creates a completion record with a generated ID.
    pub fn new(completed_at: Option<NaiveDateTime>) -> Self {
        Self {
            id: Uuid::new_v4(),
            completed_at,
        }
    }

    /// Completion at midnight of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(Some(date.and_time(chrono::NaiveTime::MIN)))
    }

    /// Calendar date of the completion, if any.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completed_at.map(|at| at.date())
    }
}
