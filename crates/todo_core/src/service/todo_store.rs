//! Todo state store.
//!
//! # Responsibility
//! - Own the ordered todo collection as the single source of truth.
//! - Apply mutations and mirror the full collection into a storage slot.
//! - Derive category, overdue and completion views on demand.
//!
//! # Invariants
//! - Ids are unique across the collection at all times.
//! - Insertion order is preserved; toggles and updates never reorder.
//! - Derived views are recomputed on every call, nothing is cached.
//! - Neither load nor persistence failures surface to callers; the
//!   in-memory collection stays authoritative for the session.

use crate::model::todo::{Todo, TodoDraft, TodoId, TodoPatch};
use crate::persist::{decode_todos, encode_todos, PersistError, STORAGE_KEY};
use crate::storage::{StateStorage, StorageError};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a mirror write was skipped.
#[derive(Debug)]
pub enum PersistFailure {
    Encode(PersistError),
    Storage(StorageError),
}

impl Display for PersistFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

/// Explicit state container for the todo collection.
pub struct TodoStore<S: StateStorage> {
    storage: S,
    key: String,
    todos: Vec<Todo>,
    last_persist_failure: Option<PersistFailure>,
}

impl<S: StateStorage> TodoStore<S> {
    /// Creates a store from whatever the default slot holds.
    ///
    /// Missing, unreadable or corrupt state yields an empty collection.
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, STORAGE_KEY)
    }

    /// Creates a store persisting under a caller-chosen slot key.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            todos: Vec::new(),
            last_persist_failure: None,
        };
        store.reload();
        store
    }

    /// Replaces the in-memory collection with the slot contents.
    ///
    /// Follows the same best-effort rules as [`TodoStore::load`].
    pub fn reload(&mut self) {
        self.todos = self.read_slot();
    }

    fn read_slot(&self) -> Vec<Todo> {
        let text = match self.storage.read(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!("event=state_load module=store status=empty");
                return Vec::new();
            }
            Err(err) => {
                warn!("event=state_load module=store status=error error_code=storage_unavailable error={err}");
                return Vec::new();
            }
        };

        match decode_todos(&text) {
            Ok(decoded) => {
                for record in &decoded.dropped {
                    warn!(
                        "event=state_load module=store status=partial error_code=persisted_state_corrupt index={} reason={}",
                        record.index, record.reason
                    );
                }
                info!(
                    "event=state_load module=store status=ok loaded={} dropped={}",
                    decoded.todos.len(),
                    decoded.dropped.len()
                );
                decoded.todos
            }
            Err(err) => {
                warn!("event=state_load module=store status=error error_code=persisted_state_corrupt error={err}");
                Vec::new()
            }
        }
    }

    /// Appends a new todo built from `draft` and returns its id.
    pub fn add_todo(&mut self, draft: TodoDraft) -> TodoId {
        let mut todo = Todo::from_draft(draft, Utc::now());
        // Ids stay unique even if v4 generation repeats.
        while self.position(todo.id).is_some() {
            todo.id = uuid::Uuid::new_v4();
        }
        let id = todo.id;
        self.todos.push(todo);
        debug!("event=todo_add module=store status=ok id={id}");
        self.persist();
        id
    }

    /// Flips completion of the matching todo. Returns `false` when no todo matched.
    pub fn toggle_todo(&mut self, id: TodoId) -> bool {
        let found = match self.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.toggle();
                true
            }
            None => false,
        };
        debug!("event=todo_toggle module=store found={found} id={id}");
        self.persist();
        found
    }

    /// Removes the matching todo. Returns `false` when no todo matched.
    pub fn delete_todo(&mut self, id: TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        let found = self.todos.len() != before;
        debug!("event=todo_delete module=store found={found} id={id}");
        self.persist();
        found
    }

    /// Removes every completed todo, keeping the rest in order.
    ///
    /// Returns the number of removed todos.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| !todo.completed);
        let removed = before - self.todos.len();
        debug!("event=todo_clear_completed module=store removed={removed}");
        self.persist();
        removed
    }

    /// Merges `patch` into the matching todo. Returns `false` when no todo matched.
    pub fn update_todo(&mut self, id: TodoId, patch: &TodoPatch) -> bool {
        let found = match self.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.apply_patch(patch);
                true
            }
            None => false,
        };
        debug!("event=todo_update module=store found={found} id={id}");
        self.persist();
        found
    }

    /// Read-only snapshot of the collection in insertion order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Todos whose category equals `category` exactly, in storage order.
    pub fn todos_by_category(&self, category: &str) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| todo.category == category)
            .collect()
    }

    /// Open todos whose due date is strictly before the current time.
    pub fn overdue_todos(&self) -> Vec<&Todo> {
        self.overdue_todos_at(Utc::now())
    }

    /// Open todos whose due date is strictly before `now`.
    pub fn overdue_todos_at(&self, now: DateTime<Utc>) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| todo.is_overdue_at(now))
            .collect()
    }

    /// Percentage of completed todos, `100` for an empty collection.
    ///
    /// Rounds half up: 1 of 8 (12.5%) reports `13`.
    pub fn completion_rate(&self) -> u8 {
        let total = self.todos.len();
        if total == 0 {
            return 100;
        }
        let completed = self.todos.iter().filter(|todo| todo.completed).count();
        let rate = (200 * completed + total) / (2 * total);
        u8::try_from(rate).unwrap_or(100)
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.todos
            .iter()
            .map(|todo| todo.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Error from the most recent mirror write, cleared by the next success.
    pub fn last_persist_failure(&self) -> Option<&PersistFailure> {
        self.last_persist_failure.as_ref()
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn persist(&mut self) {
        let result = encode_todos(&self.todos)
            .map_err(PersistFailure::Encode)
            .and_then(|text| {
                self.storage
                    .write(&self.key, &text)
                    .map_err(PersistFailure::Storage)
            });

        match result {
            Ok(()) => {
                debug!(
                    "event=state_persist module=store status=ok count={}",
                    self.todos.len()
                );
                self.last_persist_failure = None;
            }
            Err(err) => {
                warn!("event=state_persist module=store status=error error={err}");
                self.last_persist_failure = Some(err);
            }
        }
    }
}
