use chrono::FixedOffset;
use lazylife_core::repo::slot_store::ACHIEVEMENTS_KEY;
use lazylife_core::{
    level_for, AchievementService, ManualClock, MemorySlotStore, NewTask, TaskService, TaskType,
};

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn ids(unlocked: &[&lazylife_core::Achievement]) -> Vec<&'static str> {
    unlocked.iter().map(|achievement| achievement.id).collect()
}

#[test]
fn unlocks_fire_once_in_catalog_order() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(12 * HOUR_MS);
    let mut tasks = TaskService::load_with_retention(&store, &clock, None);
    let mut achievements = AchievementService::load(&store).with_utc_offset(utc());

    let parent = tasks
        .add(NewTask::new("Plan").due(chrono::DateTime::from_timestamp(0, 0).unwrap()))
        .unwrap();
    tasks.add(NewTask::new("Step").under(parent.id)).unwrap();
    assert!(achievements.observe(tasks.tasks(), tasks.stats()).is_empty());

    tasks.toggle_completion(parent.id).unwrap();
    let unlocked = achievements.observe(tasks.tasks(), tasks.stats());
    assert_eq!(ids(&unlocked), vec!["first-step", "planner", "strategist"]);

    let raw = store.raw(ACHIEVEMENTS_KEY).unwrap();
    let persisted: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, vec!["first-step", "planner", "strategist"]);
}

#[test]
fn earned_achievements_are_never_revoked() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(12 * HOUR_MS);
    let mut tasks = TaskService::load_with_retention(&store, &clock, None);
    let mut achievements = AchievementService::load(&store).with_utc_offset(utc());

    let task = tasks.add(NewTask::new("Only")).unwrap();
    tasks.toggle_completion(task.id).unwrap();
    assert_eq!(
        ids(&achievements.observe(tasks.tasks(), tasks.stats())),
        vec!["first-step"]
    );

    tasks.toggle_completion(task.id).unwrap();
    assert!(achievements.observe(tasks.tasks(), tasks.stats()).is_empty());
    assert!(achievements.is_earned("first-step"));

    tasks.toggle_completion(task.id).unwrap();
    assert!(achievements.observe(tasks.tasks(), tasks.stats()).is_empty());

    tasks.delete(task.id).unwrap();
    let reloaded = AchievementService::load(&store);
    assert!(reloaded.is_earned("first-step"));
}

#[test]
fn predicate_that_stayed_false_is_not_awarded_on_recompletion() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(12 * HOUR_MS);
    let mut tasks = TaskService::load_with_retention(&store, &clock, None);
    let mut achievements = AchievementService::load(&store).with_utc_offset(utc());

    let task = tasks.add(NewTask::new("Daily")).unwrap();
    tasks.toggle_completion(task.id).unwrap();
    achievements.observe(tasks.tasks(), tasks.stats());

    tasks.toggle_completion(task.id).unwrap();
    achievements.observe(tasks.tasks(), tasks.stats());
    tasks.toggle_completion(task.id).unwrap();
    achievements.observe(tasks.tasks(), tasks.stats());

    assert!(!achievements.is_earned("unstoppable-3"));
    assert!(!achievements.is_earned("task-crusher-10"));
}

#[test]
fn streak_and_type_rules_unlock_from_service_activity() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(12 * HOUR_MS);
    let mut tasks = TaskService::load_with_retention(&store, &clock, None);
    let mut achievements = AchievementService::load(&store).with_utc_offset(utc());

    let mut unlocked = Vec::new();
    for day in 0..10 {
        clock.set(day * DAY_MS + 12 * HOUR_MS);
        let task = tasks
            .add(NewTask::new(format!("work {day}")).kind(TaskType::Work))
            .unwrap();
        tasks.toggle_completion(task.id).unwrap();
        unlocked.extend(ids(&achievements.observe(tasks.tasks(), tasks.stats())));
    }

    assert_eq!(
        unlocked,
        vec![
            "first-step",
            "unstoppable-3",
            "unstoppable-7",
            "task-crusher-10",
            "work-whiz"
        ]
    );
    assert_eq!(level_for(tasks.stats().total_completed_count).name, "Novice");
}
