use lazylife_core::repo::slot_store::{LAST_CLEANUP_KEY, STATS_KEY, TASKS_KEY};
use lazylife_core::{
    ManualClock, MemorySlotStore, NewTask, SlotStore, Task, TaskPatch, TaskService,
    TaskServiceError, TaskType,
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn service<'a>(
    store: &'a MemorySlotStore,
    clock: &'a ManualClock,
) -> TaskService<&'a MemorySlotStore, &'a ManualClock> {
    TaskService::load_with_retention(store, clock, None)
}

fn completed(service: &TaskService<&MemorySlotStore, &ManualClock>, task: &Task) -> bool {
    service.get(task.id).unwrap().completed
}

#[test]
fn toggling_parent_sets_every_subtask() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(1_000);
    let mut tasks = service(&store, &clock);

    let parent = tasks.add(NewTask::new("Move house")).unwrap();
    let a = tasks.add(NewTask::new("Pack").under(parent.id)).unwrap();
    let b = tasks.add(NewTask::new("Clean").under(parent.id)).unwrap();
    tasks.toggle_completion(b.id).unwrap();

    clock.advance(10);
    let outcome = tasks.toggle_completion(parent.id).unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.changed, vec![parent.id, a.id]);
    assert!(completed(&tasks, &a));
    assert!(completed(&tasks, &b));
    assert_eq!(tasks.get(a.id).unwrap().updated_at, 1_010);

    tasks.toggle_completion(parent.id).unwrap();
    assert!(!completed(&tasks, &parent));
    assert!(!completed(&tasks, &a));
    assert!(!completed(&tasks, &b));
}

#[test]
fn subtask_toggle_rederives_parent() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);

    let parent = tasks.add(NewTask::new("Trip")).unwrap();
    let a = tasks.add(NewTask::new("Book").under(parent.id)).unwrap();
    let b = tasks.add(NewTask::new("Pack").under(parent.id)).unwrap();

    tasks.toggle_completion(a.id).unwrap();
    assert!(!completed(&tasks, &parent));

    let outcome = tasks.toggle_completion(b.id).unwrap();
    assert_eq!(outcome.changed, vec![b.id, parent.id]);
    assert!(completed(&tasks, &parent));

    tasks.toggle_completion(a.id).unwrap();
    assert!(!completed(&tasks, &parent));
    assert!(completed(&tasks, &b));
}

#[test]
fn deleting_parent_cascades_but_subtask_delete_is_local() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);

    let keep = tasks.add(NewTask::new("Keep")).unwrap();
    let keep_a = tasks.add(NewTask::new("keep a").under(keep.id)).unwrap();
    let keep_b = tasks.add(NewTask::new("keep b").under(keep.id)).unwrap();
    tasks.toggle_completion(keep_a.id).unwrap();

    let removed = tasks.delete(keep_b.id).unwrap();
    assert_eq!(removed, vec![keep_b.id]);
    assert!(!completed(&tasks, &keep));
    assert!(completed(&tasks, &keep_a));

    let drop = tasks.add(NewTask::new("Drop")).unwrap();
    let drop_a = tasks.add(NewTask::new("drop a").under(drop.id)).unwrap();
    let removed = tasks.delete(drop.id).unwrap();
    assert_eq!(removed, vec![drop.id, drop_a.id]);
    assert_eq!(tasks.tasks().len(), 2);
    assert!(tasks.get(drop_a.id).is_none());
}

#[test]
fn add_validates_title_and_nesting() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);

    assert_eq!(
        tasks.add(NewTask::new("   ")).unwrap_err(),
        TaskServiceError::EmptyTitle
    );

    let parent = tasks.add(NewTask::new("  Parent  ")).unwrap();
    assert_eq!(parent.title, "Parent");
    let child = tasks.add(NewTask::new("child").under(parent.id)).unwrap();

    let err = tasks.add(NewTask::new("grandchild").under(child.id)).unwrap_err();
    assert_eq!(err, TaskServiceError::NestedSubtask(child.id));

    let missing = uuid::Uuid::new_v4();
    let err = tasks.add(NewTask::new("x").under(missing)).unwrap_err();
    assert_eq!(err, TaskServiceError::ParentNotFound(missing));
}

#[test]
fn update_bumps_updated_at_and_keeps_created_at() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(100);
    let mut tasks = service(&store, &clock);
    let task = tasks.add(NewTask::new("Draft")).unwrap();

    clock.set(250);
    tasks
        .update(
            task.id,
            TaskPatch {
                content: Some("body".to_string()),
                kind: Some(TaskType::Study),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    let updated = tasks.get(task.id).unwrap();
    assert_eq!(updated.content, "body");
    assert_eq!(updated.kind, TaskType::Study);
    assert_eq!(updated.created_at, 100);
    assert_eq!(updated.updated_at, 250);

    clock.set(300);
    tasks.update(task.id, TaskPatch::default()).unwrap();
    assert_eq!(tasks.get(task.id).unwrap().updated_at, 300);

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        tasks.update(missing, TaskPatch::default()).unwrap_err(),
        TaskServiceError::TaskNotFound(missing)
    );
}

#[test]
fn reload_reproduces_the_same_list() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(5);
    let saved = {
        let mut tasks = service(&store, &clock);
        let parent = tasks
            .add(
                NewTask::new("Parent")
                    .kind(TaskType::Work)
                    .due(chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
            )
            .unwrap();
        let child = tasks.add(NewTask::new("Child").under(parent.id)).unwrap();
        tasks.toggle_completion(child.id).unwrap();
        tasks.tasks().to_vec()
    };

    let reloaded = service(&store, &clock);
    assert_eq!(reloaded.tasks(), saved.as_slice());
}

#[test]
fn storage_failures_are_swallowed() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);
    let first = tasks.add(NewTask::new("persisted")).unwrap();

    store.set_failing(true);
    tasks.add(NewTask::new("memory only")).unwrap();
    assert_eq!(tasks.tasks().len(), 2);

    store.set_failing(false);
    let reloaded = service(&store, &clock);
    assert_eq!(reloaded.tasks().len(), 1);
    assert_eq!(reloaded.tasks()[0].id, first.id);
}

#[test]
fn corrupt_task_slot_loads_empty() {
    let store = MemorySlotStore::new();
    store.set(TASKS_KEY, "[{\"id\": 7").unwrap();
    let clock = ManualClock::new(0);
    let tasks = service(&store, &clock);
    assert!(tasks.tasks().is_empty());
}

#[test]
fn one_bad_record_does_not_hide_the_rest() {
    let store = MemorySlotStore::new();
    store
        .set(
            TASKS_KEY,
            r#"[
                {"id":"00000000-0000-0000-0000-000000000001","title":"kept","createdAt":1,"updatedAt":1,"type":"work"},
                {"id":"00000000-0000-0000-0000-000000000002","title":"gym","createdAt":2,"updatedAt":2,"type":"gym"},
                {"id":"not-a-uuid","title":"odd id","createdAt":3,"updatedAt":3}
            ]"#,
        )
        .unwrap();
    let clock = ManualClock::new(10);
    let mut tasks = service(&store, &clock);
    let titles: Vec<_> = tasks.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["kept"]);
    assert_eq!(tasks.tasks()[0].kind, TaskType::Work);

    tasks.add(NewTask::new("new")).unwrap();
    let reloaded = service(&store, &clock);
    let titles: Vec<_> = reloaded.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["kept", "new"]);
}

#[test]
fn out_of_range_cleanup_stamps_are_restamped() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(5_000);
    let task = service(&store, &clock).add(NewTask::new("stays")).unwrap();

    for stamp in [i64::MIN, -1, i64::MAX] {
        store.set(LAST_CLEANUP_KEY, &stamp.to_string()).unwrap();
        let tasks = TaskService::load(&store, &clock);
        assert_eq!(tasks.tasks().len(), 1, "stamp {stamp}");
        assert_eq!(tasks.tasks()[0].id, task.id);
        assert_eq!(store.raw(LAST_CLEANUP_KEY).as_deref(), Some("5000"));
    }

    clock.advance(30 * DAY_MS + 1);
    assert!(TaskService::load(&store, &clock).tasks().is_empty());
}

#[test]
fn retention_sweep_purges_after_thirty_days() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    {
        let mut tasks = TaskService::load(&store, &clock);
        tasks.add(NewTask::new("old")).unwrap();
    }
    assert_eq!(store.raw(LAST_CLEANUP_KEY).as_deref(), Some("0"));

    clock.set(30 * DAY_MS);
    assert_eq!(TaskService::load(&store, &clock).tasks().len(), 1);

    clock.set(30 * DAY_MS + 1);
    let tasks = TaskService::load(&store, &clock);
    assert!(tasks.tasks().is_empty());
    assert_eq!(
        store.raw(LAST_CLEANUP_KEY),
        Some((30 * DAY_MS + 1).to_string())
    );
}

#[test]
fn stats_counter_survives_deletes_and_heals_drift() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);

    let a = tasks.add(NewTask::new("a")).unwrap();
    let b = tasks.add(NewTask::new("b")).unwrap();
    tasks.toggle_completion(a.id).unwrap();
    tasks.toggle_completion(b.id).unwrap();
    tasks.delete(a.id).unwrap();
    assert_eq!(tasks.stats().total_completed_count, 2);
    assert_eq!(tasks.completed_count(), 1);

    store.set(STATS_KEY, r#"{"totalCompletedCount":0}"#).unwrap();
    let reloaded = service(&store, &clock);
    assert_eq!(reloaded.stats().total_completed_count, 1);
}

#[test]
fn apply_edit_skips_unchanged_values() {
    let store = MemorySlotStore::new();
    let clock = ManualClock::new(0);
    let mut tasks = service(&store, &clock);
    let task = tasks.add(NewTask::new("Title")).unwrap();

    clock.set(50);
    assert!(!tasks.apply_edit(task.id, "Title", "").unwrap());
    assert_eq!(tasks.get(task.id).unwrap().updated_at, 0);

    assert!(tasks.apply_edit(task.id, "Title", "notes").unwrap());
    assert_eq!(tasks.get(task.id).unwrap().updated_at, 50);
}
