//! Core use-case services.
//!
//! # Responsibility
//! - Wire repository reads into the pure statistics engine.
//! - Keep CLI/API callers decoupled from storage details.

pub mod statistics_service;
