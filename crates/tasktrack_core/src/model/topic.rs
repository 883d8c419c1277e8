//! Topic and task aggregates as supplied by the data-access layer.
//!
//! # Responsibility
//! - Hold fully hydrated topics (tasks, rules, completions) for one computation.
//! - Provide write-path validation for repository implementations.
//!
//! # Invariants
//! - Task order inside a topic is the order the collaborator supplied.
//! - Absent collections deserialize as empty, never as an error.
//! - `color` is an opaque display string and is never interpreted.

use crate::model::schedule::{CompletionRecord, RecurrenceRule};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TopicId = Uuid;
pub type TaskId = Uuid;

/// Task priority carried through to due-task projections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Validation errors raised before aggregates are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Title is empty after trim.
    BlankTitle,
    /// Nil UUID used as identity.
    NilId,
    /// Owning user ID is empty after trim.
    BlankUserId,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::NilId => write!(f, "identifier must not be the nil uuid"),
            Self::BlankUserId => write!(f, "user id must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}

/// A recurring task with its schedule and completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAggregate {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub rules: Vec<RecurrenceRule>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

impl TaskAggregate {
    /// Creates a task with a generated ID and no schedule.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            priority: TaskPriority::default(),
            rules: Vec::new(),
            completions: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: RecurrenceRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_completion(mut self, completion: CompletionRecord) -> Self {
        self.completions.push(completion);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_identity(self.id, &self.title)
    }
}

/// A user-owned topic grouping tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAggregate {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskAggregate>,
}

impl TopicAggregate {
    /// Creates a topic with a generated ID and no tasks.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            color: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_task(mut self, task: TaskAggregate) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_identity(self.id, &self.title)
    }
}

/// Rejects blank owner IDs before they reach storage.
pub fn validate_user_id(user_id: &str) -> Result<(), ModelValidationError> {
    if user_id.trim().is_empty() {
        return Err(ModelValidationError::BlankUserId);
    }
    Ok(())
}

/// Rejects titles that are empty after trim.
pub fn validate_title(title: &str) -> Result<(), ModelValidationError> {
    if title.trim().is_empty() {
        return Err(ModelValidationError::BlankTitle);
    }
    Ok(())
}

fn validate_identity(id: Uuid, title: &str) -> Result<(), ModelValidationError> {
    if id.is_nil() {
        return Err(ModelValidationError::NilId);
    }
    validate_title(title)
}
