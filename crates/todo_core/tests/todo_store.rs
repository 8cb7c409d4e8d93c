use chrono::{Duration, Utc};
use std::collections::HashSet;
use todo_core::persist::decode_todos;
use todo_core::{
    MemoryStateStorage, Priority, StateStorage, TodoDraft, TodoPatch, TodoStore, STORAGE_KEY,
};
use uuid::Uuid;

fn draft(text: &str, category: &str) -> TodoDraft {
    TodoDraft::new(text, Priority::Medium, category)
}

#[test]
fn buy_milk_scenario() {
    let mut store = TodoStore::load(MemoryStateStorage::new());

    let id = store.add_todo(TodoDraft::new("Buy milk", Priority::Low, "shopping"));
    assert_eq!(store.len(), 1);
    let todo = store.get(id).unwrap();
    assert!(!todo.completed);
    assert_eq!(todo.category, "shopping");
    assert_eq!(todo.priority, Priority::Low);

    assert!(store.toggle_todo(id));
    assert!(store.get(id).unwrap().completed);
    assert_eq!(store.completion_rate(), 100);

    assert!(store.delete_todo(id));
    assert!(store.is_empty());
    assert_eq!(store.completion_rate(), 100);
}

#[test]
fn completion_rate_of_one_in_three_is_33() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let first = store.add_todo(draft("a", "x"));
    store.add_todo(draft("b", "x"));
    store.add_todo(draft("c", "x"));
    store.toggle_todo(first);

    assert_eq!(store.completion_rate(), 33);
}

#[test]
fn add_stamps_fresh_id_and_creation_time() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let before = Utc::now() - Duration::milliseconds(1);

    let id = store.add_todo(draft("stamp me", "x"));

    let todo = store.get(id).unwrap();
    assert!(!todo.id.is_nil());
    assert!(todo.created_at >= before);
    assert!(todo.created_at <= Utc::now());
}

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let mut ids = Vec::new();
    for round in 0..20 {
        ids.push(store.add_todo(draft(&format!("item {round}"), "x")));
        if round % 3 == 0 {
            store.toggle_todo(ids[round / 2]);
        }
        if round % 5 == 4 {
            store.delete_todo(ids[round - 1]);
        }
    }

    let unique: HashSet<_> = store.todos().iter().map(|todo| todo.id).collect();
    assert_eq!(unique.len(), store.len());
}

#[test]
fn added_todo_appears_once_at_end_of_its_category() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    store.add_todo(draft("older", "work"));
    store.add_todo(draft("other", "home"));

    let id = store.add_todo(draft("newest", "work"));

    let work = store.todos_by_category("work");
    assert_eq!(work.iter().filter(|todo| todo.id == id).count(), 1);
    assert_eq!(work.last().unwrap().id, id);
    assert_eq!(work.len(), 2);
}

#[test]
fn category_filter_is_exact_match() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    store.add_todo(draft("a", "Work"));
    store.add_todo(draft("b", "work "));

    assert!(store.todos_by_category("work").is_empty());
    assert_eq!(store.todos_by_category("Work").len(), 1);
}

#[test]
fn clear_completed_is_idempotent_and_keeps_order() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let a = store.add_todo(draft("a", "x"));
    let b = store.add_todo(draft("b", "x"));
    let c = store.add_todo(draft("c", "x"));
    let d = store.add_todo(draft("d", "x"));
    store.toggle_todo(b);
    store.toggle_todo(d);

    assert_eq!(store.clear_completed(), 2);
    let once = store.todos().to_vec();
    assert_eq!(store.clear_completed(), 0);

    assert_eq!(store.todos(), once.as_slice());
    let order: Vec<_> = store.todos().iter().map(|todo| todo.id).collect();
    assert_eq!(order, vec![a, c]);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    store.add_todo(draft("keep", "x"));
    let snapshot = store.todos().to_vec();
    let missing = Uuid::new_v4();

    assert!(!store.toggle_todo(missing));
    assert!(!store.delete_todo(missing));
    assert!(!store.update_todo(
        missing,
        &TodoPatch {
            text: Some("nope".to_string()),
            ..TodoPatch::default()
        }
    ));

    assert_eq!(store.todos(), snapshot.as_slice());
}

#[test]
fn update_merges_patch_and_keeps_identity_and_position() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    store.add_todo(draft("first", "x"));
    let id = store.add_todo(draft("second", "x"));
    store.add_todo(draft("third", "x"));
    let original = store.get(id).unwrap().clone();
    let due = Utc::now() + Duration::days(2);

    assert!(store.update_todo(
        id,
        &TodoPatch {
            text: Some("second, edited".to_string()),
            priority: Some(Priority::High),
            due_date: Some(Some(due)),
            ..TodoPatch::default()
        }
    ));

    let updated = &store.todos()[1];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.text, "second, edited");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.category, "x");
    assert!(updated.due_date.is_some());
    assert!(!updated.completed);
}

#[test]
fn overdue_requires_past_due_date_and_open_state() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let now = Utc::now();
    let past = store.add_todo(draft("late", "x").with_due_date(now - Duration::hours(1)));
    store.add_todo(draft("future", "x").with_due_date(now + Duration::hours(1)));
    let done = store.add_todo(draft("done late", "x").with_due_date(now - Duration::days(3)));
    store.add_todo(draft("no due", "x"));
    store.toggle_todo(done);

    let overdue: Vec<_> = store.overdue_todos().iter().map(|todo| todo.id).collect();
    assert_eq!(overdue, vec![past]);
}

#[test]
fn overdue_boundary_is_strict() {
    let mut store = TodoStore::load(MemoryStateStorage::new());
    let due = Utc::now() + Duration::days(1);
    store.add_todo(draft("edge", "x").with_due_date(due));
    let due = store.todos()[0].due_date.unwrap();

    assert!(store.overdue_todos_at(due).is_empty());
    assert_eq!(store.overdue_todos_at(due + Duration::milliseconds(1)).len(), 1);
}

#[test]
fn every_mutation_mirrors_collection_to_storage() {
    let storage = MemoryStateStorage::new();
    let mut store = TodoStore::load(&storage);

    let id = store.add_todo(draft("persisted", "x"));
    let stored = decode_todos(&storage.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.todos, store.todos());

    store.toggle_todo(id);
    let stored = decode_todos(&storage.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert!(stored.todos[0].completed);

    store.clear_completed();
    let stored = decode_todos(&storage.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert!(stored.todos.is_empty());
}

#[test]
fn storage_failure_keeps_in_memory_effect() {
    let storage = MemoryStateStorage::new();
    storage.set_read_only(true);
    let mut store = TodoStore::load(&storage);

    let id = store.add_todo(draft("memory only", "x"));

    assert_eq!(store.len(), 1);
    assert!(store.get(id).is_some());
    assert!(store.last_persist_failure().is_some());
    assert_eq!(storage.read(STORAGE_KEY).unwrap(), None);

    storage.set_read_only(false);
    store.toggle_todo(id);
    assert!(store.last_persist_failure().is_none());
    assert!(storage.read(STORAGE_KEY).unwrap().is_some());
}

#[test]
fn reload_restores_state_written_by_another_store() {
    let storage = MemoryStateStorage::new();
    let mut writer = TodoStore::load(&storage);
    writer.add_todo(draft("shared", "x"));

    let mut reader = TodoStore::load(&storage);
    assert_eq!(reader.todos(), writer.todos());

    writer.add_todo(draft("later", "x"));
    assert_eq!(reader.len(), 1);
    reader.reload();
    assert_eq!(reader.len(), 2);
}

#[test]
fn custom_key_isolates_collections() {
    let storage = MemoryStateStorage::new();
    let mut work = TodoStore::load_with_key(&storage, "work-todos");
    work.add_todo(draft("ship", "x"));

    let default = TodoStore::load(&storage);
    assert!(default.is_empty());
    assert_eq!(TodoStore::load_with_key(&storage, "work-todos").len(), 1);
}
