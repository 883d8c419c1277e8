//! Recurring-schedule statistics engine.
//!
//! # Responsibility
//! - Count scheduled occurrences and completions inside a `Period`.
//! - Derive completion rates and roll task statistics up into topics.
//!
//! # Invariants
//! - Pure computation: no I/O, no shared mutable state, inputs are borrowed.
//! - Topic counts are sums over their tasks; topic rates derive from sums.
//! - Output order mirrors input order for topics and tasks.

pub mod aggregate;
pub mod completion;
pub mod due;
pub mod occurrence;
pub mod rate;

pub use aggregate::{compute_statistics, TaskStatistic, TopicStatistic};
pub use completion::count_completed;
pub use due::{tasks_due_on, DueTask};
pub use occurrence::count_scheduled;
pub use rate::completion_rate;
