//! Task store use-case service.
//!
//! # Responsibility
//! - Own the in-memory task list and write it through to the slot store.
//! - Enforce the one-level parent/sub-task shape.
//! - Apply completion propagation and delete cascades.
//! - Maintain the running completion counter (`Stats`).
//!
//! # Invariants
//! - Toggling a top-level task sets every direct sub-task to the same state.
//! - Toggling a sub-task sets its parent to the AND of all its siblings.
//! - Deleting a top-level task deletes its sub-tasks; deleting a sub-task
//!   leaves the parent untouched (no re-derivation on delete).
//! - Every mutation builds a new list and swaps it in; persistence failures
//!   are logged and never undo the in-memory change.

use crate::clock::Clock;
use crate::model::stats::{completed_count, Stats};
use crate::model::task::{Task, TaskId, TaskType};
use crate::repo::json_slot::{load_json, load_json_records, remove_slot, save_json};
use crate::repo::slot_store::{SlotStore, LAST_CLEANUP_KEY, STATS_KEY, TASKS_KEY};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default retention window for the task slot: 30 days.
pub const DEFAULT_RETENTION_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Errors from task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskServiceError {
    /// Title is blank after trim.
    EmptyTitle,
    TaskNotFound(TaskId),
    /// Requested parent does not exist.
    ParentNotFound(TaskId),
    /// Requested parent is itself a sub-task.
    NestedSubtask(TaskId),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent task not found: {id}"),
            Self::NestedSubtask(id) => {
                write!(f, "task {id} is a sub-task and cannot have sub-tasks")
            }
        }
    }
}

impl Error for TaskServiceError {}

/// Input for `TaskService::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub kind: TaskType,
    pub parent_id: Option<TaskId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn kind(mut self, kind: TaskType) -> Self {
        self.kind = kind;
        self
    }

    pub fn under(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Partial update for `TaskService::update`.
///
/// Completion and parentage are not patchable; `toggle_completion` owns
/// completion so propagation cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub kind: Option<TaskType>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.due_date.is_none()
            && self.kind.is_none()
    }
}

/// Result of one completion toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub task_id: TaskId,
    /// New completion state of the toggled task.
    pub completed: bool,
    /// Every task whose completion flipped, toggled task first.
    pub changed: Vec<TaskId>,
}

/// Task store over a slot store and a clock.
pub struct TaskService<S: SlotStore, C: Clock> {
    store: S,
    clock: C,
    tasks: Vec<Task>,
    stats: Stats,
}

impl<S: SlotStore, C: Clock> TaskService<S, C> {
    /// Loads the store with the default 30-day retention sweep.
    pub fn load(store: S, clock: C) -> Self {
        Self::load_with_retention(store, clock, Some(DEFAULT_RETENTION_MS))
    }

    /// Loads the store, running the retention sweep when `retention_ms` is set.
    ///
    /// Never fails: unreadable slots load as empty.
    pub fn load_with_retention(store: S, clock: C, retention_ms: Option<i64>) -> Self {
        let now = clock.now_ms();
        if let Some(window) = retention_ms {
            sweep_expired_tasks(&store, now, window);
        }

        let tasks: Vec<Task> = load_json_records(&store, TASKS_KEY).unwrap_or_default();
        let mut stats: Stats = load_json(&store, STATS_KEY).unwrap_or_default();
        if stats.reconcile(&tasks) {
            warn!(
                "event=stats_reconcile module=task_service status=drift total_completed={}",
                stats.total_completed_count
            );
        }
        info!(
            "event=tasks_load module=task_service status=ok count={} completed={}",
            tasks.len(),
            completed_count(&tasks)
        );

        Self {
            store,
            clock,
            tasks,
            stats,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Direct sub-tasks of `parent_id` in list order.
    pub fn subtasks(&self, parent_id: TaskId) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |task| task.parent_id == Some(parent_id))
    }

    /// Number of completed tasks currently in the list.
    pub fn completed_count(&self) -> u64 {
        completed_count(&self.tasks)
    }

    /// Creates one task and appends it to the list.
    pub fn add(&mut self, input: NewTask) -> Result<Task, TaskServiceError> {
        let title = normalize_title(&input.title)?;
        if let Some(parent_id) = input.parent_id {
            let parent = self
                .get(parent_id)
                .ok_or(TaskServiceError::ParentNotFound(parent_id))?;
            if parent.is_subtask() {
                return Err(TaskServiceError::NestedSubtask(parent_id));
            }
        }

        let mut task = Task::new(title, input.kind, self.clock.now_ms());
        task.due_date = input.due_date;
        task.parent_id = input.parent_id;

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next);

        info!(
            "event=task_add module=task_service status=ok id={} subtask={}",
            task.id,
            task.is_subtask()
        );
        Ok(task)
    }

    /// Applies a partial update; always bumps `updated_at`.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<(), TaskServiceError> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let now = self.clock.now_ms();

        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(content) = patch.content {
            task.content = content;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(kind) = patch.kind {
            task.kind = kind;
        }
        task.updated_at = now;
        self.commit(next);

        debug!("event=task_update module=task_service status=ok id={id}");
        Ok(())
    }

    /// Editor save path: writes title/content only when they differ.
    ///
    /// Returns whether an update was applied.
    pub fn apply_edit(
        &mut self,
        id: TaskId,
        title: &str,
        content: &str,
    ) -> Result<bool, TaskServiceError> {
        let task = self.get(id).ok_or(TaskServiceError::TaskNotFound(id))?;
        if task.title == title && task.content == content {
            return Ok(false);
        }
        self.update(
            id,
            TaskPatch {
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                ..TaskPatch::default()
            },
        )?;
        Ok(true)
    }

    /// Flips completion of one task and propagates across the family.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<ToggleOutcome, TaskServiceError> {
        let now = self.clock.now_ms();
        let mut next = self.tasks.clone();
        let index = next
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let completed = !next[index].completed;
        next[index].set_completed(completed, now);
        let mut changed = vec![id];

        match next[index].parent_id {
            None => {
                for child in next.iter_mut().filter(|task| task.parent_id == Some(id)) {
                    if child.set_completed(completed, now) {
                        changed.push(child.id);
                    }
                }
            }
            Some(parent_id) => {
                let all_siblings_done = next
                    .iter()
                    .filter(|task| task.parent_id == Some(parent_id))
                    .all(|task| task.completed);
                if let Some(parent) = next.iter_mut().find(|task| task.id == parent_id) {
                    if parent.completed != all_siblings_done {
                        parent.set_completed(all_siblings_done, now);
                        changed.push(parent_id);
                    }
                }
            }
        }

        for changed_id in &changed {
            let now_completed = next
                .iter()
                .find(|task| task.id == *changed_id)
                .is_some_and(|task| task.completed);
            if now_completed {
                self.stats.record_completed();
            } else {
                self.stats.record_reopened();
            }
        }
        self.commit(next);

        info!(
            "event=task_toggle module=task_service status=ok id={id} completed={completed} changed={}",
            changed.len()
        );
        Ok(ToggleOutcome {
            task_id: id,
            completed,
            changed,
        })
    }

    /// Deletes one task, cascading to sub-tasks of a top-level task.
    ///
    /// Returns the removed IDs, target first.
    pub fn delete(&mut self, id: TaskId) -> Result<Vec<TaskId>, TaskServiceError> {
        let target = self.get(id).ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut removed = vec![id];
        if target.is_parent() {
            removed.extend(self.subtasks(id).map(|task| task.id));
        }

        let next = self
            .tasks
            .iter()
            .filter(|task| !removed.contains(&task.id))
            .cloned()
            .collect();
        self.commit(next);

        info!(
            "event=task_delete module=task_service status=ok id={id} removed={}",
            removed.len()
        );
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.tasks = next;
        self.stats.reconcile(&self.tasks);
        save_json(&self.store, TASKS_KEY, &self.tasks);
        save_json(&self.store, STATS_KEY, &self.stats);
    }
}

fn normalize_title(value: &str) -> Result<String, TaskServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskServiceError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Clears the task slot when the retention window since the last sweep elapsed.
///
/// A missing, negative or future stamp is replaced with `now` without purging.
/// Returns `true` when tasks were purged.
fn sweep_expired_tasks(store: &impl SlotStore, now: i64, window_ms: i64) -> bool {
    match load_json::<i64>(store, LAST_CLEANUP_KEY) {
        Some(last_cleanup) if (0..=now).contains(&last_cleanup) => {
            if now.saturating_sub(last_cleanup) <= window_ms {
                return false;
            }
            remove_slot(store, TASKS_KEY);
            save_json(store, LAST_CLEANUP_KEY, &now);
            info!(
                "event=tasks_retention module=task_service status=purged last_cleanup={last_cleanup} now={now}"
            );
            true
        }
        Some(last_cleanup) => {
            warn!(
                "event=tasks_retention module=task_service status=restamp last_cleanup={last_cleanup} now={now}"
            );
            save_json(store, LAST_CLEANUP_KEY, &now);
            false
        }
        None => {
            save_json(store, LAST_CLEANUP_KEY, &now);
            false
        }
    }
}
