//! Core state store for the todo tracker.
//! This crate is the single source of truth for todo invariants; front ends
//! only call store operations and render its snapshots.

pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::todo::{Priority, Todo, TodoDraft, TodoId, TodoPatch, UNCATEGORIZED};
pub use persist::{CorruptRecord, DecodedTodos, PersistError, STORAGE_KEY};
pub use service::todo_store::{PersistFailure, TodoStore};
pub use storage::{
    MemoryStateStorage, SqliteStateStorage, StateStorage, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
