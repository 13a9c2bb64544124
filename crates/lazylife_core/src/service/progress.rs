//! Derived task views: grouping, progress summaries and breakdowns.
//!
//! All functions are pure over a task slice and borrow from it.

use crate::model::task::{Task, TaskId, TaskType};
use chrono::{DateTime, Utc};

/// Maximum number of upcoming tasks reported by `progress_summary`.
pub const UPCOMING_LIMIT: usize = 5;

/// One top-level task with its sub-tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup<'a> {
    pub parent: &'a Task,
    /// Oldest first.
    pub subtasks: Vec<&'a Task>,
}

impl TaskGroup<'_> {
    /// All sub-tasks done (and at least one exists).
    pub fn all_subtasks_done(&self) -> bool {
        !self.subtasks.is_empty() && self.subtasks.iter().all(|task| task.completed)
    }
}

/// Task list arranged for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedTasks<'a> {
    /// Incomplete top-level tasks, newest first.
    pub open: Vec<TaskGroup<'a>>,
    /// Completed top-level tasks, newest first.
    pub completed: Vec<TaskGroup<'a>>,
    /// Sub-tasks whose parent is missing.
    pub orphans: Vec<&'a Task>,
}

pub fn group_tasks(tasks: &[Task]) -> GroupedTasks<'_> {
    let mut parents: Vec<&Task> = tasks.iter().filter(|task| task.is_parent()).collect();
    parents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut grouped = GroupedTasks::default();
    for parent in parents {
        let mut subtasks: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.parent_id == Some(parent.id))
            .collect();
        subtasks.sort_by_key(|task| task.created_at);

        let group = TaskGroup { parent, subtasks };
        if parent.completed {
            grouped.completed.push(group);
        } else {
            grouped.open.push(group);
        }
    }

    grouped.orphans = tasks
        .iter()
        .filter(|task| {
            task.parent_id
                .is_some_and(|parent_id| !tasks.iter().any(|t| t.id == parent_id))
        })
        .collect();
    grouped
}

/// Overall completion picture.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary<'a> {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// `0.0` for an empty list.
    pub percent_complete: f64,
    /// Pending tasks whose due date has passed, list order.
    pub overdue: Vec<&'a Task>,
    /// Pending tasks with a due date, soonest first, at most `UPCOMING_LIMIT`.
    pub upcoming: Vec<&'a Task>,
}

pub fn progress_summary(tasks: &[Task], now: DateTime<Utc>) -> ProgressSummary<'_> {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let pending: Vec<&Task> = tasks.iter().filter(|task| !task.completed).collect();

    let overdue = pending
        .iter()
        .copied()
        .filter(|task| task.is_overdue(now))
        .collect();

    let mut upcoming: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|task| task.due_date.is_some())
        .collect();
    upcoming.sort_by_key(|task| task.due_date);
    upcoming.truncate(UPCOMING_LIMIT);

    ProgressSummary {
        total,
        completed,
        pending: pending.len(),
        percent_complete: percent(completed, total),
        overdue,
        upcoming,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtaskProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Sub-task completion for one parent; `None` when it has no sub-tasks.
pub fn subtask_progress(tasks: &[Task], parent_id: TaskId) -> Option<SubtaskProgress> {
    let (completed, total) = tasks
        .iter()
        .filter(|task| task.parent_id == Some(parent_id))
        .fold((0, 0), |(done, all), task| {
            (done + usize::from(task.completed), all + 1)
        });
    if total == 0 {
        return None;
    }
    Some(SubtaskProgress {
        completed,
        total,
        percent: percent(completed, total),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCount {
    pub kind: TaskType,
    pub completed: usize,
    pub total: usize,
}

/// Per-category counts, one entry per `TaskType` in declaration order.
pub fn type_breakdown(tasks: &[Task]) -> Vec<TypeCount> {
    TaskType::ALL
        .iter()
        .map(|&kind| {
            let of_kind = tasks.iter().filter(|task| task.kind == kind);
            TypeCount {
                kind,
                completed: of_kind.clone().filter(|task| task.completed).count(),
                total: of_kind.count(),
            }
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
