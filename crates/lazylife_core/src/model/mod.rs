//! Domain model for tasks, notes, stats, achievements and levels.
//!
//! # Responsibility
//! - Define the records persisted in key-value slots.
//! - Keep rule tables (achievement catalog, level ladder) next to the data
//!   they are evaluated against.
//!
//! # Invariants
//! - Every task and note is identified by a stable UUID.
//! - Task nesting is exactly one level deep.

pub mod achievement;
pub mod level;
pub mod note;
pub mod stats;
pub mod task;
