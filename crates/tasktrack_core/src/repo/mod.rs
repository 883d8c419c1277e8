//! Data-access layer that hydrates topic aggregates.
//!
//! # Responsibility
//! - Define the `TopicRepository` contract consumed by services.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate aggregates before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Returned aggregates are complete snapshots (tasks, rules, completions).

pub mod topic_repo;
