//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record held by the store.
//! - Provide creation, patch-merge and overdue helpers.
//!
//! # Invariants
//! - `id` and `created_at` are stamped once in `Todo::from_draft` and never
//!   change afterwards; `TodoPatch` cannot express either field.
//! - Timestamps carry at most millisecond precision, matching the persisted
//!   text format.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned to a todo at creation.
pub type TodoId = Uuid;

/// Category label callers substitute for empty category input.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Importance label attached to every todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Returns the lowercase wire form (`low|medium|high`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single trackable task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Unique within the owning collection; immutable.
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    /// Creation instant; immutable.
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: String,
}

/// Add-input: a todo without its store-assigned `id` and `created_at`.
///
/// The store accepts drafts as given. Trimming text and defaulting an empty
/// category to [`UNCATEGORIZED`] happen in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub text: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: String,
}

impl TodoDraft {
    /// Creates an open draft with no due date.
    pub fn new(text: impl Into<String>, priority: Priority, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            due_date: None,
            priority,
            category: category.into(),
        }
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update merged over an existing todo.
///
/// `None` leaves a field untouched. `due_date` is doubly optional so a patch
/// can clear it (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl TodoPatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.category.is_none()
    }
}

impl Todo {
    /// Materializes a draft with a fresh random id and `created_at = now`.
    pub fn from_draft(draft: TodoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: draft.text,
            completed: draft.completed,
            created_at: truncate_to_millis(now),
            due_date: draft.due_date.map(truncate_to_millis),
            priority: draft.priority,
            category: draft.category,
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Merges every field present in `patch`.
    pub fn apply_patch(&mut self, patch: &TodoPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date.map(truncate_to_millis);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
    }

    /// Returns whether the todo is open and its due date is strictly before `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Drops sub-millisecond precision.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    value
        .duration_trunc(Duration::milliseconds(1))
        .unwrap_or(value)
}
