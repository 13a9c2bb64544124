use lazylife_core::db::{open_db, open_db_in_memory};
use lazylife_core::{
    AchievementService, ManualClock, NewTask, SlotStore, SqliteSlotStore, TaskService,
};

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("lazylife.sqlite3");
    let clock = ManualClock::new(1_000);

    let saved = {
        let conn = open_db(&db_path).unwrap();
        let store = SqliteSlotStore::try_new(&conn).unwrap();
        let mut tasks = TaskService::load(store, &clock);
        let parent = tasks.add(NewTask::new("Parent")).unwrap();
        tasks.add(NewTask::new("Child").under(parent.id)).unwrap();
        tasks.toggle_completion(parent.id).unwrap();

        let mut achievements = AchievementService::load(store);
        achievements.observe(tasks.tasks(), tasks.stats());
        tasks.tasks().to_vec()
    };

    let conn = open_db(&db_path).unwrap();
    let store = SqliteSlotStore::try_new(&conn).unwrap();
    let tasks = TaskService::load(store, &clock);
    assert_eq!(tasks.tasks(), saved.as_slice());
    assert_eq!(tasks.stats().total_completed_count, 2);
    assert!(AchievementService::load(store).is_earned("first-step"));

    let keys = store.keys().unwrap();
    assert!(keys.contains(&"offline-task-manager-tasks".to_string()));
    assert!(keys.contains(&"offline-task-manager-last-cleanup".to_string()));
}

#[test]
fn slot_remove_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSlotStore::try_new(&conn).unwrap();
    store.set("scratch", "1").unwrap();
    store.remove("scratch").unwrap();
    store.remove("scratch").unwrap();
    assert!(store.get("scratch").unwrap().is_none());
}
