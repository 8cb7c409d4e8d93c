//! Key-value slot storage backends.
//!
//! # Responsibility
//! - Define the durable slot contract the store persists through.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - A slot holds one text value; writes replace it whole (last write wins).
//! - Reading a missing slot is `Ok(None)`, never an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStateStorage;
pub use sqlite::SqliteStateStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure to reach or use the backing slot store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Storage is disabled, full or otherwise refusing requests.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable text slots addressed by a string key.
pub trait StateStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: StateStorage + ?Sized> StateStorage for &S {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}
