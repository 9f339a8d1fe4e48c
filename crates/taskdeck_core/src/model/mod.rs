//! Domain model for taskdeck.
//!
//! # Responsibility
//! - Define the canonical task record used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; there is no tombstone state.

pub mod task;
