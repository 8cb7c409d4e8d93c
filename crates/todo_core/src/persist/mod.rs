//! Persisted-state codec for the todo collection.
//!
//! # Responsibility
//! - Convert the in-memory collection to the JSON slot layout and back.
//! - Render timestamps as locale-independent RFC 3339 text.
//!
//! # Invariants
//! - Timestamps are written in UTC with millisecond precision and a `Z`
//!   suffix (`2026-10-19T08:30:00.000Z`).
//! - An unset due date is omitted from the record, never written as a
//!   placeholder.
//! - Decoding is best-effort per record: one bad record never discards the
//!   others.

mod codec;

pub use codec::{
    decode_todos, encode_todos, format_timestamp, parse_timestamp, CorruptRecord, DecodedTodos,
};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key the store persists under unless configured otherwise.
pub const STORAGE_KEY: &str = "todo-storage";

pub type PersistResult<T> = Result<T, PersistError>;

#[derive(Debug)]
pub enum PersistError {
    /// Slot text is not a readable state document at all.
    PersistedStateCorrupt(String),
    /// The collection could not be rendered to JSON.
    Encode(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersistedStateCorrupt(message) => {
                write!(f, "persisted todo state is corrupt: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode todo state: {message}"),
        }
    }
}

impl Error for PersistError {}
