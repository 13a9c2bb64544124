//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its JSON shape.
//! - Provide parent/sub-task classification helpers.
//!
//! # Invariants
//! - A task with `parent_id` is a sub-task; sub-tasks never have children.
//! - `completed_at` is `Some` only while `completed` is true.
//! - JSON field names are camelCase (`createdAt`, `parentId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for tasks.
pub type TaskId = Uuid;

/// Fixed task category set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Personal,
    Home,
    Work,
    Couple,
    Study,
    Club,
}

impl TaskType {
    /// All categories in display order.
    pub const ALL: [TaskType; 6] = [
        TaskType::Personal,
        TaskType::Home,
        TaskType::Work,
        TaskType::Couple,
        TaskType::Study,
        TaskType::Club,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Home => "home",
            Self::Work => "work",
            Self::Couple => "couple",
            Self::Study => "study",
            Self::Club => "club",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped by every mutation.
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Serialized as `type` to match the stored blob format.
    #[serde(rename = "type", default)]
    pub kind: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,
    /// Unix epoch milliseconds of the latest false -> true transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Creates an open task with a generated ID.
    pub fn new(title: impl Into<String>, kind: TaskType, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            completed: false,
            created_at: now_ms,
            updated_at: now_ms,
            due_date: None,
            kind,
            parent_id: None,
            completed_at: None,
        }
    }

    pub fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Top-level task (may or may not have sub-tasks).
    pub fn is_parent(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Sets completion state and keeps `completed_at`/`updated_at` in step.
    ///
    /// Returns `true` when the state actually changed.
    pub fn set_completed(&mut self, completed: bool, now_ms: i64) -> bool {
        let changed = self.completed != completed;
        self.completed = completed;
        self.updated_at = now_ms;
        if changed {
            self.completed_at = completed.then_some(now_ms);
        }
        changed
    }

    /// Timestamp used for day/hour based rules.
    ///
    /// Records written before `completed_at` existed fall back to `updated_at`.
    pub fn activity_at(&self) -> i64 {
        self.completed_at.unwrap_or(self.updated_at)
    }

    /// Whether a pending task is past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}
