//! Topic repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Eager-load a user's topics with tasks, rules and completions.
//! - Provide the writes needed to populate and maintain that graph
//!   (create, rename/recolor, reprioritize, delete).
//!
//! # Invariants
//! - Topics are returned in creation order; tasks, rules and completions
//!   keep insertion order within their parent.
//! - Deleting a topic or task cascades to everything it owns.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::schedule::{CompletionId, CompletionRecord, Recurrence, RecurrenceRule};
use crate::model::topic::{
    validate_title, validate_user_id, ModelValidationError, TaskAggregate, TaskId, TaskPriority, TopicAggregate,
    TopicId,
};
use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for topic graph persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// Connection schema is not at the version this build expects.
    SchemaMismatch { found: u32, expected: u32 },
    NotFound { entity: &'static str, id: Uuid },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaMismatch { found, expected } => write!(
                f,
                "database schema version {found} does not match expected {expected}"
            ),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::SchemaMismatch { .. } | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read contract consumed by the statistics service.
pub trait TopicRepository {
    /// Returns every topic owned by `user_id`, fully hydrated.
    fn fetch_topics_for_user(&self, user_id: &str) -> RepoResult<Vec<TopicAggregate>>;
}

impl<R: TopicRepository + ?Sized> TopicRepository for &R {
    fn fetch_topics_for_user(&self, user_id: &str) -> RepoResult<Vec<TopicAggregate>> {
        (**self).fetch_topics_for_user(user_id)
    }
}

/// In-memory repository over pre-built aggregates, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTopicRepository {
    topics: HashMap<String, Vec<TopicAggregate>>,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, topic: TopicAggregate) {
        self.topics.entry(user_id.into()).or_default().push(topic);
    }
}

impl TopicRepository for InMemoryTopicRepository {
    fn fetch_topics_for_user(&self, user_id: &str) -> RepoResult<Vec<TopicAggregate>> {
        Ok(self.topics.get(user_id).cloned().unwrap_or_default())
    }
}

/// SQLite-backed topic repository.
pub struct SqliteTopicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTopicRepository<'conn> {
    /// Wraps a connection whose schema is fully migrated.
    ///
    /// # Errors
    /// - `RepoError::SchemaMismatch` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let found = schema_version(conn)?;
        let expected = latest_version();
        if found != expected {
            return Err(RepoError::SchemaMismatch { found, expected });
        }
        Ok(Self { conn })
    }

    /// Persists `topic` and all tasks nested in it for `user_id`.
    pub fn create_topic(&self, user_id: &str, topic: &TopicAggregate) -> RepoResult<TopicId> {
        validate_user_id(user_id)?;
        topic.validate()?;
        for task in &topic.tasks {
            task.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO topics (uuid, user_id, title, color) VALUES (?1, ?2, ?3, ?4);",
            params![
                topic.id.to_string(),
                user_id,
                topic.title.as_str(),
                topic.color.as_deref()
            ],
        )?;
        for task in &topic.tasks {
            insert_task(&tx, topic.id, task)?;
        }
        tx.commit()?;

        Ok(topic.id)
    }

    /// Persists `task` with its initial rules and completions under `topic_id`.
    pub fn create_task(&self, topic_id: TopicId, task: &TaskAggregate) -> RepoResult<TaskId> {
        task.validate()?;
        if !self.exists("topics", topic_id)? {
            return Err(RepoError::NotFound {
                entity: "topic",
                id: topic_id,
            });
        }

        let tx = self.conn.unchecked_transaction()?;
        insert_task(&tx, topic_id, task)?;
        tx.commit()?;

        Ok(task.id)
    }

    /// Appends a completion event to `task_id`.
    pub fn record_completion(
        &self,
        task_id: TaskId,
        completed_at: Option<NaiveDateTime>,
    ) -> RepoResult<CompletionId> {
        if !self.exists("tasks", task_id)? {
            return Err(RepoError::NotFound {
                entity: "task",
                id: task_id,
            });
        }

        let record = CompletionRecord::new(completed_at);
        insert_completion(self.conn, task_id, &record)?;
        Ok(record.id)
    }

    /// Replaces a topic's title and color. Tasks are untouched.
    pub fn update_topic(&self, id: TopicId, title: &str, color: Option<&str>) -> RepoResult<()> {
        validate_title(title)?;
        let changed = self.conn.execute(
            "UPDATE topics SET title = ?2, color = ?3 WHERE uuid = ?1;",
            params![id.to_string(), title, color],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "topic", id });
        }
        Ok(())
    }

    /// Replaces a task's title and priority. Rules and completions are untouched.
    pub fn update_task(&self, id: TaskId, title: &str, priority: TaskPriority) -> RepoResult<()> {
        validate_title(title)?;
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, priority = ?3 WHERE uuid = ?1;",
            params![id.to_string(), title, priority_to_db(priority)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    pub fn delete_completion(&self, id: CompletionId) -> RepoResult<()> {
        self.delete_by_uuid("task_completions", "completion", id)
    }

    /// Deletes a task with its rules and completions.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.delete_by_uuid("tasks", "task", id)
    }

    /// Deletes a topic with every task it owns.
    pub fn delete_topic(&self, id: TopicId) -> RepoResult<()> {
        self.delete_by_uuid("topics", "topic", id)
    }

    fn exists(&self, table: &'static str, id: Uuid) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {table} WHERE uuid = ?1;"),
                [id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn delete_by_uuid(&self, table: &'static str, entity: &'static str, id: Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE uuid = ?1;"), [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity, id });
        }
        Ok(())
    }
}

impl TopicRepository for SqliteTopicRepository<'_> {
    fn fetch_topics_for_user(&self, user_id: &str) -> RepoResult<Vec<TopicAggregate>> {
        let mut topics = Vec::new();
        let mut topic_index: HashMap<TopicId, usize> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT uuid, title, color
                 FROM topics
                 WHERE user_id = ?1
                 ORDER BY created_at ASC, rowid ASC;",
            )?;
            let mut rows = stmt.query([user_id])?;
            while let Some(row) = rows.next()? {
                let id = parse_uuid(row, "uuid", "topics.uuid")?;
                topic_index.insert(id, topics.len());
                topics.push(TopicAggregate {
                    id,
                    title: row.get("title")?,
                    color: row.get("color")?,
                    tasks: Vec::new(),
                });
            }
        }
        if topics.is_empty() {
            return Ok(topics);
        }

        // task uuid -> (topic position, task position)
        let mut task_index: HashMap<TaskId, (usize, usize)> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT t.uuid, t.topic_uuid, t.title, t.priority
                 FROM tasks t
                 JOIN topics p ON p.uuid = t.topic_uuid
                 WHERE p.user_id = ?1
                 ORDER BY t.created_at ASC, t.rowid ASC;",
            )?;
            let mut rows = stmt.query([user_id])?;
            while let Some(row) = rows.next()? {
                let id = parse_uuid(row, "uuid", "tasks.uuid")?;
                let topic_id = parse_uuid(row, "topic_uuid", "tasks.topic_uuid")?;
                let priority_text: String = row.get("priority")?;
                let priority = parse_priority(&priority_text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid priority `{priority_text}` in tasks.priority"
                    ))
                })?;
                let topic_pos = *topic_index.get(&topic_id).ok_or_else(|| {
                    RepoError::InvalidData(format!("task {id} references unknown topic"))
                })?;
                let tasks = &mut topics[topic_pos].tasks;
                task_index.insert(id, (topic_pos, tasks.len()));
                tasks.push(TaskAggregate {
                    id,
                    title: row.get("title")?,
                    priority,
                    rules: Vec::new(),
                    completions: Vec::new(),
                });
            }
        }

        {
            let mut stmt = self.conn.prepare(
                "SELECT s.task_uuid, s.day_of_week, s.options
                 FROM task_schedules s
                 JOIN tasks t ON t.uuid = s.task_uuid
                 JOIN topics p ON p.uuid = t.topic_uuid
                 WHERE p.user_id = ?1
                 ORDER BY s.id ASC;",
            )?;
            let mut rows = stmt.query([user_id])?;
            while let Some(row) = rows.next()? {
                let task_id = parse_uuid(row, "task_uuid", "task_schedules.task_uuid")?;
                let day_text: String = row.get("day_of_week")?;
                let day = parse_weekday(&day_text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid day `{day_text}` in task_schedules.day_of_week"
                    ))
                })?;
                let task = locate_task(&mut topics, &task_index, task_id)?;
                task.rules.push(RecurrenceRule {
                    recurrence: Recurrence::Weekly { day },
                    options: row.get("options")?,
                });
            }
        }

        {
            let mut stmt = self.conn.prepare(
                "SELECT c.uuid, c.task_uuid, c.completed_at
                 FROM task_completions c
                 JOIN tasks t ON t.uuid = c.task_uuid
                 JOIN topics p ON p.uuid = t.topic_uuid
                 WHERE p.user_id = ?1
                 ORDER BY c.rowid ASC;",
            )?;
            let mut rows = stmt.query([user_id])?;
            while let Some(row) = rows.next()? {
                let id = parse_uuid(row, "uuid", "task_completions.uuid")?;
                let task_id = parse_uuid(row, "task_uuid", "task_completions.task_uuid")?;
                let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
                    Some(millis) => Some(millis_to_naive(millis).ok_or_else(|| {
                        RepoError::InvalidData(format!(
                            "invalid timestamp `{millis}` in task_completions.completed_at"
                        ))
                    })?),
                    None => None,
                };
                let task = locate_task(&mut topics, &task_index, task_id)?;
                task.completions.push(CompletionRecord { id, completed_at });
            }
        }

        Ok(topics)
    }
}

fn insert_task(conn: &Connection, topic_id: TopicId, task: &TaskAggregate) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO tasks (uuid, topic_uuid, title, priority) VALUES (?1, ?2, ?3, ?4);",
        params![
            task.id.to_string(),
            topic_id.to_string(),
            task.title.as_str(),
            priority_to_db(task.priority)
        ],
    )?;

    let mut rule_stmt = conn.prepare(
        "INSERT INTO task_schedules (task_uuid, day_of_week, options) VALUES (?1, ?2, ?3);",
    )?;
    for rule in &task.rules {
        let Recurrence::Weekly { day } = rule.recurrence;
        rule_stmt.execute(params![
            task.id.to_string(),
            weekday_to_db(day),
            rule.options.as_deref()
        ])?;
    }

    for completion in &task.completions {
        insert_completion(conn, task.id, completion)?;
    }
    Ok(())
}

fn insert_completion(conn: &Connection, task_id: TaskId, record: &CompletionRecord) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO task_completions (uuid, task_uuid, completed_at) VALUES (?1, ?2, ?3);",
        params![
            record.id.to_string(),
            task_id.to_string(),
            record.completed_at.map(naive_to_millis)
        ],
    )?;
    Ok(())
}

fn locate_task<'a>(
    topics: &'a mut [TopicAggregate],
    index: &HashMap<TaskId, (usize, usize)>,
    task_id: TaskId,
) -> RepoResult<&'a mut TaskAggregate> {
    let (topic_pos, task_pos) = *index.get(&task_id).ok_or_else(|| {
        RepoError::InvalidData(format!("row references unknown task {task_id}"))
    })?;
    Ok(&mut topics[topic_pos].tasks[task_pos])
}

fn parse_uuid(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}

/// Completion timestamps are stored as epoch milliseconds of the wall-clock value.
fn naive_to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

fn millis_to_naive(millis: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|value| value.naive_utc())
}

fn weekday_to_db(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn priority_to_db(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Normal => "normal",
        TaskPriority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "low" => Some(TaskPriority::Low),
        "normal" => Some(TaskPriority::Normal),
        "high" => Some(TaskPriority::High),
        _ => None,
    }
}
