//! Domain model for topics, tasks and their schedule/completion history.
//!
//! # Responsibility
//! - Define the read-only aggregates handed to the statistics engine.
//! - Define the half-open `Period` used as the computation window.
//!
//! # Invariants
//! - Topics own their tasks; tasks own their rules and completions.
//! - No aggregate carries a back-pointer to its parent.

pub mod period;
pub mod schedule;
pub mod topic;
