//! Achievement evaluation service.
//!
//! # Responsibility
//! - Track earned achievement IDs and persist them to their own slot.
//! - Evaluate the catalog when the completed-task count rises.
//!
//! # Invariants
//! - Earned achievements are never revoked.
//! - Evaluation runs only on an increase of the completed count, never on a
//!   decrease or an unchanged count.
//! - New unlocks are reported once, in catalog order.
//! - Unknown persisted IDs are kept so newer data survives older binaries.

use crate::model::achievement::{
    find_achievement, local_utc_offset, Achievement, AchievementContext, ACHIEVEMENTS,
};
use crate::model::stats::{completed_count, Stats};
use crate::model::task::Task;
use crate::repo::json_slot::{load_json_records, save_json};
use crate::repo::slot_store::{SlotStore, ACHIEVEMENTS_KEY};
use chrono::FixedOffset;
use log::info;

pub struct AchievementService<S: SlotStore> {
    store: S,
    /// Earned IDs in unlock order.
    earned: Vec<String>,
    last_completed: u64,
    utc_offset: FixedOffset,
}

impl<S: SlotStore> AchievementService<S> {
    /// Loads earned IDs; the observed completed count starts at zero.
    pub fn load(store: S) -> Self {
        let stored: Vec<String> = load_json_records(&store, ACHIEVEMENTS_KEY).unwrap_or_default();
        let mut earned: Vec<String> = Vec::with_capacity(stored.len());
        for id in stored {
            if !earned.contains(&id) {
                earned.push(id);
            }
        }
        Self {
            store,
            earned,
            last_completed: 0,
            utc_offset: local_utc_offset(),
        }
    }

    /// Overrides the offset used for day/hour rules.
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn catalog(&self) -> &'static [Achievement] {
        ACHIEVEMENTS
    }

    pub fn is_earned(&self, id: &str) -> bool {
        self.earned.iter().any(|earned| earned == id)
    }

    pub fn earned_ids(&self) -> &[String] {
        &self.earned
    }

    /// Earned achievements known to this catalog, in unlock order.
    pub fn earned(&self) -> Vec<&'static Achievement> {
        self.earned
            .iter()
            .filter_map(|id| find_achievement(id))
            .collect()
    }

    /// Records `tasks` as the baseline without evaluating anything.
    ///
    /// Callers that load a list and then mutate it prime first, so only the
    /// mutation itself can count as an increase.
    pub fn prime(&mut self, tasks: &[Task]) {
        self.last_completed = completed_count(tasks);
    }

    /// Observes the current task list and returns newly unlocked achievements.
    pub fn observe(&mut self, tasks: &[Task], stats: &Stats) -> Vec<&'static Achievement> {
        let completed = completed_count(tasks);
        let increased = completed > self.last_completed;
        self.last_completed = completed;
        if !increased {
            return Vec::new();
        }

        let ctx = AchievementContext::new(tasks, stats, self.utc_offset);
        let unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|achievement| !self.is_earned(achievement.id))
            .filter(|achievement| achievement.is_satisfied(&ctx))
            .collect();
        if unlocked.is_empty() {
            return unlocked;
        }

        for achievement in &unlocked {
            self.earned.push(achievement.id.to_string());
            info!(
                "event=achievement_unlocked module=achievement_service status=ok id={}",
                achievement.id
            );
        }
        save_json(&self.store, ACHIEVEMENTS_KEY, &self.earned);
        unlocked
    }
}
