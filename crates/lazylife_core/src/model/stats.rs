//! Aggregate completion stats.
//!
//! # Invariants
//! - `total_completed_count` never drops below the number of completed tasks
//!   present in the list it is reconciled against.
//! - Deleting tasks never lowers the counter.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_completed_count: u64,
}

impl Stats {
    pub fn record_completed(&mut self) {
        self.total_completed_count = self.total_completed_count.saturating_add(1);
    }

    pub fn record_reopened(&mut self) {
        self.total_completed_count = self.total_completed_count.saturating_sub(1);
    }

    /// Raises the counter to the derivable lower bound.
    ///
    /// Returns `true` when the counter had drifted below it.
    pub fn reconcile(&mut self, tasks: &[Task]) -> bool {
        let derived = completed_count(tasks);
        if self.total_completed_count < derived {
            self.total_completed_count = derived;
            return true;
        }
        false
    }
}

/// Number of completed tasks (parents and sub-tasks alike).
pub fn completed_count(tasks: &[Task]) -> u64 {
    tasks.iter().filter(|task| task.completed).count() as u64
}

#[cfg(test)]
mod tests {
    use super::{completed_count, Stats};
    use crate::model::task::{Task, TaskType};

    #[test]
    fn reconcile_only_raises_counter() {
        let mut done = Task::new("a", TaskType::Personal, 0);
        done.completed = true;
        let tasks = vec![done, Task::new("b", TaskType::Personal, 0)];
        assert_eq!(completed_count(&tasks), 1);

        let mut stats = Stats::default();
        assert!(stats.reconcile(&tasks));
        assert_eq!(stats.total_completed_count, 1);

        stats.total_completed_count = 7;
        assert!(!stats.reconcile(&tasks));
        assert_eq!(stats.total_completed_count, 7);
    }

    #[test]
    fn reopen_saturates_at_zero() {
        let mut stats = Stats::default();
        stats.record_reopened();
        assert_eq!(stats.total_completed_count, 0);
    }
}
