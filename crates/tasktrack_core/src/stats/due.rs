//! "Due today" projection over topic aggregates.
//!
//! A task is due on a date when at least one of its rules fires on that
//! date and none of its completions fall on it.

use crate::model::topic::{TaskId, TaskPriority, TopicAggregate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task still open on a given date, with its topic color attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueTask {
    pub task_id: TaskId,
    pub title: String,
    pub priority: TaskPriority,
    pub color: Option<String>,
}

/// Returns tasks scheduled on `date` with no completion on `date`.
///
/// Ordered by topic, then by task, as supplied.
pub fn tasks_due_on(topics: &[TopicAggregate], date: NaiveDate) -> Vec<DueTask> {
    topics
        .iter()
        .flat_map(|topic| {
            topic
                .tasks
                .iter()
                .filter(move |task| {
                    let scheduled = task.rules.iter().any(|rule| rule.fires_on(date));
                    let done = task
                        .completions
                        .iter()
                        .any(|completion| completion.completion_date() == Some(date));
                    scheduled && !done
                })
                .map(move |task| DueTask {
                    task_id: task.id,
                    title: task.title.clone(),
                    priority: task.priority,
                    color: topic.color.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tasks_due_on;
    use crate::model::schedule::{CompletionRecord, RecurrenceRule};
    use crate::model::topic::{TaskAggregate, TaskPriority, TopicAggregate};
    use chrono::{NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn selects_scheduled_and_uncompleted_tasks_only() {
        // 2024-01-03 is a Wednesday.
        let today = date(2024, 1, 3);
        let open = TaskAggregate::new("open")
            .with_priority(TaskPriority::High)
            .with_rule(RecurrenceRule::weekly(Weekday::Wed));
        let done = TaskAggregate::new("done")
            .with_rule(RecurrenceRule::weekly(Weekday::Wed))
            .with_completion(CompletionRecord::on(today));
        let done_last_week = TaskAggregate::new("done last week")
            .with_rule(RecurrenceRule::weekly(Weekday::Wed))
            .with_completion(CompletionRecord::on(date(2023, 12, 27)));
        let other_day = TaskAggregate::new("friday").with_rule(RecurrenceRule::weekly(Weekday::Fri));
        let topic = TopicAggregate::new("Home")
            .with_color("teal")
            .with_task(open.clone())
            .with_task(done)
            .with_task(done_last_week.clone())
            .with_task(other_day);

        let due = tasks_due_on(&[topic], today);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].task_id, open.id);
        assert_eq!(due[0].priority, TaskPriority::High);
        assert_eq!(due[0].color.as_deref(), Some("teal"));
        assert_eq!(due[1].task_id, done_last_week.id);
    }

    #[test]
    fn tasks_without_rules_are_never_due() {
        let topic = TopicAggregate::new("Inbox").with_task(TaskAggregate::new("someday"));
        assert!(tasks_due_on(&[topic], date(2024, 1, 3)).is_empty());
    }
}
