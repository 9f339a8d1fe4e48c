//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for task records.
//! - Isolate SQLite query details from the store's orchestration logic.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - List order is insertion order, guaranteed by the `seq` column.

pub mod task_repo;
