//! Core domain logic for LazyLife.
//! This crate is the single source of truth for task, note and achievement
//! invariants; front ends only render and forward input.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::achievement::{find_achievement, Achievement, AchievementContext, ACHIEVEMENTS};
pub use model::level::{level_for, level_progress, Level, LevelProgress, LEVELS};
pub use model::note::{Note, NoteId};
pub use model::stats::{completed_count, Stats};
pub use model::task::{Task, TaskId, TaskType};
pub use repo::memory_store::MemorySlotStore;
pub use repo::slot_store::{RepoError, RepoResult, SlotStore};
pub use repo::sqlite_store::SqliteSlotStore;
pub use service::achievement_service::AchievementService;
pub use service::autosave::Debouncer;
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::progress::{
    group_tasks, progress_summary, subtask_progress, type_breakdown, GroupedTasks,
    ProgressSummary, SubtaskProgress, TaskGroup, TypeCount, UPCOMING_LIMIT,
};
pub use service::summarize::{
    render_prompt, PromptSummarizer, SummarizeError, SummarizeRequest, SummarizeResponse,
    Summarizer,
};
pub use service::task_service::{NewTask, TaskPatch, TaskService, TaskServiceError, ToggleOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
