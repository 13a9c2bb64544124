//! Use-case services over the slot store.
//!
//! # Responsibility
//! - Hold in-memory state for tasks, notes and achievements.
//! - Compute derived views (progress, grouping, levels) from that state.
//! - Keep callers decoupled from the storage backend.

pub mod achievement_service;
pub mod autosave;
pub mod note_service;
pub mod progress;
pub mod summarize;
pub mod task_service;
