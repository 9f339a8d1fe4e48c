use std::collections::HashSet;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    CompletionPolicy, NewTask, RepoError, SqliteTaskRepository, StoreConfig, StoreError,
    StoreEvent, TaskStore, ToggleOutcome,
};

fn new_task(title: &str, due_at: i64) -> NewTask {
    NewTask {
        title: title.to_string(),
        due_at,
    }
}

#[test]
fn insert_then_query_contains_exactly_one_new_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    // 2024-09-03T10:00:00Z
    let inserted = store.insert(&new_task("Buy milk", 1_725_357_600_000)).unwrap();

    let tasks = store.tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, inserted.id);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].due_at, 1_725_357_600_000);
    assert!(!tasks[0].completed);
}

#[test]
fn inserted_ids_are_unique_across_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    for index in 0..10 {
        store.insert(&new_task("same title", index)).unwrap();
    }

    let ids: HashSet<_> = store.tasks().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn delete_removes_record_and_count_drops_by_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let kept = store.insert(&new_task("keep", 1)).unwrap();
    let dropped = store.insert(&new_task("drop", 2)).unwrap();
    assert_eq!(store.len().unwrap(), 2);

    store.delete(dropped.id).unwrap();

    let tasks = store.tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks.iter().all(|t| t.id != dropped.id));
    assert_eq!(tasks[0].id, kept.id);
}

#[test]
fn toggle_from_false_removes_record_under_default_policy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let task = store.insert(&new_task("finish report", 0)).unwrap();

    let outcome = store.toggle_completion(task.id).unwrap();
    match outcome {
        ToggleOutcome::Removed(removed) => {
            assert_eq!(removed.id, task.id);
            assert!(removed.completed);
        }
        other => panic!("expected removal, got {other:?}"),
    }

    assert!(store.tasks().unwrap().is_empty());
}

#[test]
fn retain_policy_keeps_completed_task_and_toggles_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let config = StoreConfig {
        completion_policy: CompletionPolicy::RetainCompleted,
        ..StoreConfig::default()
    };
    let mut store = TaskStore::with_config(repo, config);

    let task = store.insert(&new_task("water plants", 0)).unwrap();

    let outcome = store.toggle_completion(task.id).unwrap();
    assert!(matches!(outcome, ToggleOutcome::Retained(ref t) if t.completed));
    let tasks = store.tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].completed);

    let outcome = store.toggle_completion(task.id).unwrap();
    assert!(matches!(outcome, ToggleOutcome::Retained(ref t) if !t.completed));
    assert!(!store.tasks().unwrap()[0].completed);
}

#[test]
fn query_size_equals_inserts_minus_deletes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let mut inserts = 0u64;
    let mut deletes = 0u64;

    let a = store.insert(&new_task("a", 1)).unwrap();
    let b = store.insert(&new_task("b", 2)).unwrap();
    let _c = store.insert(&new_task("c", 3)).unwrap();
    inserts += 3;

    store.delete(a.id).unwrap();
    deletes += 1;

    let d = store.insert(&new_task("d", 4)).unwrap();
    inserts += 1;

    // Completion-triggered deletes count too.
    store.toggle_completion(b.id).unwrap();
    deletes += 1;
    store.toggle_completion(d.id).unwrap();
    deletes += 1;

    assert_eq!(store.len().unwrap(), inserts - deletes);
    assert_eq!(store.tasks().unwrap().len() as u64, inserts - deletes);
}

#[test]
fn delete_middle_record_preserves_relative_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let a = store.insert(&new_task("A", 1)).unwrap();
    let b = store.insert(&new_task("B", 2)).unwrap();
    let c = store.insert(&new_task("C", 3)).unwrap();

    store.delete(b.id).unwrap();

    let ids: Vec<_> = store.tasks().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a.id, c.id]);
}

#[test]
fn empty_title_insert_succeeds_by_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let task = store.insert(&new_task("", 1_700_000_000_000)).unwrap();
    let tasks = store.tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].title, "");
}

#[test]
fn require_title_config_rejects_empty_title() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let config = StoreConfig {
        require_title: true,
        ..StoreConfig::default()
    };
    let mut store = TaskStore::with_config(repo, config);

    let err = store.insert(&new_task("   ", 0)).unwrap_err();
    assert!(matches!(err, StoreError(RepoError::Validation(_))));
    assert!(store.is_empty().unwrap());
}

#[test]
fn subscribers_observe_every_mutation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);
    let subscription = store.subscribe();

    let a = store.insert(&new_task("a", 1)).unwrap();
    let b = store.insert(&new_task("b", 2)).unwrap();
    store.delete(a.id).unwrap();
    store.toggle_completion(b.id).unwrap();

    let events = subscription.drain();
    assert_eq!(
        events,
        vec![
            StoreEvent::Inserted(a.id),
            StoreEvent::Inserted(b.id),
            StoreEvent::Removed(a.id),
            StoreEvent::Removed(b.id),
        ]
    );

    // Nothing new since the last drain.
    assert!(subscription.drain().is_empty());
}

#[test]
fn retained_toggle_emits_updated_event() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let config = StoreConfig {
        completion_policy: CompletionPolicy::RetainCompleted,
        ..StoreConfig::default()
    };
    let mut store = TaskStore::with_config(repo, config);
    let subscription = store.subscribe();

    let task = store.insert(&new_task("a", 1)).unwrap();
    store.toggle_completion(task.id).unwrap();

    let events = subscription.drain();
    assert_eq!(
        events,
        vec![StoreEvent::Inserted(task.id), StoreEvent::Updated(task.id)]
    );
}

#[test]
fn dropped_subscription_does_not_block_mutations() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let subscription = store.subscribe();
    drop(subscription);

    store.insert(&new_task("still works", 0)).unwrap();
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn toggle_missing_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut store = TaskStore::new(repo);

    let err = store.toggle_completion(uuid::Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StoreError(RepoError::NotFound(_))));
}
