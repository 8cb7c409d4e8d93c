//! SQLite-backed slot storage over the `kv_slots` table.

use super::{StateStorage, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot storage borrowing a migrated connection from [`crate::db::open_db`].
pub struct SqliteStateStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateStorage<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateStorage for SqliteStateStorage<'_> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
