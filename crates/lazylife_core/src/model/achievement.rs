//! Achievement catalog and evaluation context.
//!
//! # Responsibility
//! - Define the static list of badges and their predicates.
//! - Derive local calendar days/hours from task timestamps.
//!
//! # Invariants
//! - Predicates are pure; they only read the context.
//! - Catalog order is evaluation order and unlock-notification order.
//! - Achievement IDs are stable; they are the persisted form.

use crate::model::stats::{completed_count, Stats};
use crate::model::task::{Task, TaskType};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike};
use std::collections::HashSet;

const EARLY_BIRD_BEFORE_HOUR: u32 = 8;
const NIGHT_OWL_FROM_HOUR: u32 = 22;

/// The host's current UTC offset, used when no offset is configured.
pub fn local_utc_offset() -> FixedOffset {
    chrono::Local::now().offset().fix()
}

/// Input handed to every achievement predicate.
#[derive(Debug, Clone, Copy)]
pub struct AchievementContext<'a> {
    pub tasks: &'a [Task],
    pub stats: &'a Stats,
    /// Offset used to turn epoch timestamps into local days and hours.
    pub utc_offset: FixedOffset,
}

impl<'a> AchievementContext<'a> {
    pub fn new(tasks: &'a [Task], stats: &'a Stats, utc_offset: FixedOffset) -> Self {
        Self {
            tasks,
            stats,
            utc_offset,
        }
    }

    fn completed(&self) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(|task| task.completed)
    }

    /// Completed total: running counter or list count, whichever is larger.
    fn completed_total(&self) -> u64 {
        self.stats
            .total_completed_count
            .max(completed_count(self.tasks))
    }

    fn completed_of_kind(&self, kind: TaskType) -> usize {
        self.completed().filter(|task| task.kind == kind).count()
    }

    fn local_time(&self, epoch_ms: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&self.utc_offset))
    }

    fn distinct_completion_days(&self) -> usize {
        self.completed()
            .filter_map(|task| self.local_time(task.activity_at()))
            .map(|at| at.date_naive())
            .collect::<HashSet<NaiveDate>>()
            .len()
    }

    fn any_completed_at_hour(&self, accept: impl Fn(u32) -> bool) -> bool {
        self.completed()
            .filter_map(|task| self.local_time(task.activity_at()))
            .any(|at| accept(at.hour()))
    }
}

/// Static badge definition.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub check: fn(&AchievementContext<'_>) -> bool,
}

impl Achievement {
    pub fn is_satisfied(&self, ctx: &AchievementContext<'_>) -> bool {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Achievement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Looks up a catalog entry by ID.
pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|achievement| achievement.id == id)
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    // First steps
    Achievement {
        id: "first-step",
        name: "Starter",
        description: "Completed your first task.",
        icon: "footprints",
        check: |ctx| ctx.completed().next().is_some(),
    },
    Achievement {
        id: "planner",
        name: "Planner",
        description: "Created a task with a due date.",
        icon: "calendar-check",
        check: |ctx| ctx.tasks.iter().any(|task| task.due_date.is_some()),
    },
    Achievement {
        id: "strategist",
        name: "Strategist",
        description: "Split a task into smaller sub-tasks.",
        icon: "goal",
        check: |ctx| {
            ctx.tasks.iter().filter(|task| task.is_parent()).any(|parent| {
                ctx.tasks
                    .iter()
                    .any(|sub| sub.parent_id == Some(parent.id))
            })
        },
    },
    // Consistency
    Achievement {
        id: "unstoppable-3",
        name: "Consistent",
        description: "Completed at least one task on 3 different days.",
        icon: "trending-up",
        check: |ctx| ctx.distinct_completion_days() >= 3,
    },
    Achievement {
        id: "unstoppable-7",
        name: "Determined",
        description: "Completed at least one task on 7 different days.",
        icon: "rocket",
        check: |ctx| ctx.distinct_completion_days() >= 7,
    },
    // Volume
    Achievement {
        id: "task-crusher-10",
        name: "Task Crusher",
        description: "Completed 10 tasks.",
        icon: "zap",
        check: |ctx| ctx.completed_total() >= 10,
    },
    Achievement {
        id: "task-champion-50",
        name: "Task Champion",
        description: "Completed 50 tasks.",
        icon: "crown",
        check: |ctx| ctx.completed_total() >= 50,
    },
    Achievement {
        id: "task-legend-100",
        name: "Task Legend",
        description: "Completed 100 tasks!",
        icon: "gem",
        check: |ctx| ctx.completed_total() >= 100,
    },
    // Focus
    Achievement {
        id: "work-whiz",
        name: "Work Whiz",
        description: "Completed 10 work tasks.",
        icon: "briefcase",
        check: |ctx| ctx.completed_of_kind(TaskType::Work) >= 10,
    },
    Achievement {
        id: "athlete",
        name: "Athlete",
        description: "Completed 10 club tasks.",
        icon: "dumbbell",
        check: |ctx| ctx.completed_of_kind(TaskType::Club) >= 10,
    },
    Achievement {
        id: "scholar",
        name: "Scholar",
        description: "Completed 10 study tasks.",
        icon: "book-open",
        check: |ctx| ctx.completed_of_kind(TaskType::Study) >= 10,
    },
    Achievement {
        id: "self-improver",
        name: "Self Improver",
        description: "Completed 10 personal tasks.",
        icon: "user",
        check: |ctx| ctx.completed_of_kind(TaskType::Personal) >= 10,
    },
    Achievement {
        id: "couple-goals",
        name: "Couple Goals",
        description: "Completed 10 couple tasks.",
        icon: "heart",
        check: |ctx| ctx.completed_of_kind(TaskType::Couple) >= 10,
    },
    // Challenges
    Achievement {
        id: "early-bird",
        name: "Early Bird",
        description: "Completed a task before 8 AM.",
        icon: "sunrise",
        check: |ctx| ctx.any_completed_at_hour(|hour| hour < EARLY_BIRD_BEFORE_HOUR),
    },
    Achievement {
        id: "night-owl",
        name: "Night Owl",
        description: "Completed a task after 10 PM.",
        icon: "moon",
        check: |ctx| ctx.any_completed_at_hour(|hour| hour >= NIGHT_OWL_FROM_HOUR),
    },
];
