//! Statistics use-case service.
//!
//! # Responsibility
//! - Fetch a user's topic snapshot and hand it to the statistics engine.
//! - Resolve named presets into concrete periods for callers.
//!
//! # Invariants
//! - One repository read per call; the snapshot is immutable afterwards.
//! - Logs carry counts and durations only, never titles or colors.

use crate::model::period::{Period, PeriodError, PeriodPreset};
use crate::repo::topic_repo::{RepoError, TopicRepository};
use crate::stats::{compute_statistics, tasks_due_on, DueTask, TopicStatistic};
use chrono::NaiveDate;
use log::{debug, error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from statistics service operations.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Period(PeriodError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Period(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Period(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PeriodError> for ServiceError {
    fn from(value: PeriodError) -> Self {
        Self::Period(value)
    }
}

/// One preset's resolved period with its report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetStatistics {
    pub preset: PeriodPreset,
    pub period: Period,
    pub topics: Vec<TopicStatistic>,
}

/// Use-case entry points for completion statistics.
pub struct StatisticsService<R: TopicRepository> {
    repo: R,
}

impl<R: TopicRepository> StatisticsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes the report for `user_id` over an explicit period.
    pub fn statistics_for_period(
        &self,
        user_id: &str,
        period: &Period,
    ) -> ServiceResult<Vec<TopicStatistic>> {
        let started_at = Instant::now();
        let topics = match self.repo.fetch_topics_for_user(user_id) {
            Ok(topics) => topics,
            Err(err) => {
                error!(
                    "event=statistics_compute module=service status=error error_code=fetch_failed error={err}"
                );
                return Err(err.into());
            }
        };

        let report = compute_statistics(&topics, period);
        info!(
            "event=statistics_compute module=service status=ok start={} end={} topics={} tasks={} duration_ms={}",
            period.start(),
            period.end(),
            report.len(),
            report.iter().map(|t| t.task_statistics.len()).sum::<usize>(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Computes the report for the preset window containing `today`.
    pub fn statistics_for_preset(
        &self,
        user_id: &str,
        preset: PeriodPreset,
        today: NaiveDate,
    ) -> ServiceResult<Vec<TopicStatistic>> {
        let period = preset.period_for(today)?;
        debug!("event=period_resolve module=service status=ok preset={preset}");
        self.statistics_for_period(user_id, &period)
    }

    /// Computes all four preset reports from a single snapshot.
    ///
    /// Each preset runs on its own scoped thread; the snapshot is shared
    /// read-only, so no synchronization is needed.
    pub fn statistics_for_all_presets(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> ServiceResult<Vec<PresetStatistics>> {
        let periods = PeriodPreset::ALL
            .iter()
            .map(|preset| preset.period_for(today).map(|period| (*preset, period)))
            .collect::<Result<Vec<_>, PeriodError>>()?;
        let topics = self.repo.fetch_topics_for_user(user_id)?;

        let reports = std::thread::scope(|scope| {
            let handles: Vec<_> = periods
                .iter()
                .map(|(preset, period)| {
                    let topics = &topics;
                    scope.spawn(move || PresetStatistics {
                        preset: *preset,
                        period: *period,
                        topics: compute_statistics(topics, period),
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(report) => report,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect::<Vec<_>>()
        });

        info!(
            "event=statistics_compute module=service status=ok presets={} topics={}",
            reports.len(),
            topics.len()
        );
        Ok(reports)
    }

    /// Lists tasks scheduled on `date` that are not yet completed on it.
    pub fn tasks_due_on(&self, user_id: &str, date: NaiveDate) -> ServiceResult<Vec<DueTask>> {
        let topics = self.repo.fetch_topics_for_user(user_id)?;
        let due = tasks_due_on(&topics, date);
        info!(
            "event=due_tasks module=service status=ok date={date} count={}",
            due.len()
        );
        Ok(due)
    }
}
