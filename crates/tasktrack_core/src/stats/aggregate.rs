//! Task and topic statistics for one period.
//!
//! # Responsibility
//! - Compute per-task statistics as a pure function of task and period.
//! - Fold task statistics into topic totals and derive the topic rate.
//!
//! # Invariants
//! - `TopicStatistic` counts equal the sums of its task counts.
//! - Topic rate is computed from summed counts, never averaged task rates.
//! - Topic order and task order mirror the input.

use crate::model::period::Period;
use crate::model::topic::{TaskAggregate, TopicAggregate};
use crate::stats::completion::count_completed;
use crate::stats::occurrence::count_scheduled;
use crate::stats::rate::completion_rate;
use serde::{Deserialize, Serialize};

/// Scheduled versus completed occurrences for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatistic {
    pub task_title: String,
    pub completed_count: u32,
    pub scheduled_count: u32,
    pub completion_rate: f64,
}

impl TaskStatistic {
    /// Computes the statistic for `task` over `period`.
    pub fn for_task(task: &TaskAggregate, period: &Period) -> Self {
        let completed_count = count_completed(&task.completions, period);
        let scheduled_count = count_scheduled(&task.rules, period);
        Self {
            task_title: task.title.clone(),
            completed_count,
            scheduled_count,
            completion_rate: completion_rate(completed_count, scheduled_count),
        }
    }
}

/// Rolled-up statistics for one topic with its task breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStatistic {
    pub topic_title: String,
    /// Verbatim display color of the topic.
    pub color: Option<String>,
    pub completed_count: u32,
    pub scheduled_count: u32,
    pub completion_rate: f64,
    pub task_statistics: Vec<TaskStatistic>,
}

impl TopicStatistic {
    /// Computes task statistics for `topic`, then folds them into totals.
    pub fn for_topic(topic: &TopicAggregate, period: &Period) -> Self {
        let task_statistics: Vec<TaskStatistic> = topic
            .tasks
            .iter()
            .map(|task| TaskStatistic::for_task(task, period))
            .collect();

        let (completed_count, scheduled_count) =
            task_statistics
                .iter()
                .fold((0u32, 0u32), |(completed, scheduled), stat| {
                    (
                        completed.saturating_add(stat.completed_count),
                        scheduled.saturating_add(stat.scheduled_count),
                    )
                });

        Self {
            topic_title: topic.title.clone(),
            color: topic.color.clone(),
            completed_count,
            scheduled_count,
            completion_rate: completion_rate(completed_count, scheduled_count),
            task_statistics,
        }
    }
}

/// Computes the ordered statistics report for `topics` over `period`.
pub fn compute_statistics(topics: &[TopicAggregate], period: &Period) -> Vec<TopicStatistic> {
    topics
        .iter()
        .map(|topic| TopicStatistic::for_topic(topic, period))
        .collect()
}
