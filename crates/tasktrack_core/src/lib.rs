//! Core domain logic for tasktrack.
//!
//! The statistics engine (`stats`) is pure computation over topic
//! aggregates; `repo`, `db` and `service` provide a reference SQLite
//! collaborator that hydrates those aggregates.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use config::{ConfigError, CoreConfig};
pub use logging::{init_logging, logging_status, LogLevel};
pub use model::period::{Period, PeriodError, PeriodPreset};
pub use model::schedule::{CompletionId, CompletionRecord, Recurrence, RecurrenceRule};
pub use model::topic::{
    ModelValidationError, TaskAggregate, TaskId, TaskPriority, TopicAggregate, TopicId,
};
pub use repo::topic_repo::{
    InMemoryTopicRepository, RepoError, RepoResult, SqliteTopicRepository, TopicRepository,
};
pub use service::statistics_service::{
    PresetStatistics, ServiceError, ServiceResult, StatisticsService,
};
pub use stats::{
    completion_rate, compute_statistics, count_completed, count_scheduled, tasks_due_on, DueTask,
    TaskStatistic, TopicStatistic,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
