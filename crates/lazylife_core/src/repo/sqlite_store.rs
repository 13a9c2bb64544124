//! SQLite-backed slot store.
//!
//! # Responsibility
//! - Persist slots as rows of the `slots` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Constructed only over a connection with migrations applied.
//! - `set` is an upsert; one row per key.

use crate::db::migrations::{current_version, latest_version};
use crate::repo::slot_store::{validate_slot_key, RepoError, RepoResult, SlotStore};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot store over a borrowed SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::Unavailable` when the schema is behind this binary.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version = current_version(conn)?;
        if version < latest_version() {
            return Err(RepoError::Unavailable(format!(
                "database schema version {version} is older than required {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }

    /// Lists stored slot keys in ascending order.
    pub fn keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM slots ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        validate_slot_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        validate_slot_key(key)?;
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        validate_slot_key(key)?;
        self.conn.execute("DELETE FROM slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSlotStore;
    use crate::db::open_db_in_memory;
    use crate::repo::slot_store::{RepoError, SlotStore};
    use rusqlite::Connection;

    #[test]
    fn upsert_overwrites_existing_value() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::try_new(&conn).unwrap();
        store.set("tasks", "[]").unwrap();
        store.set("tasks", "[1]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.keys().unwrap(), vec!["tasks".to_string()]);
    }

    #[test]
    fn rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteSlotStore::try_new(&conn).unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));
    }

    #[test]
    fn invalid_key_never_reaches_sql() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::try_new(&conn).unwrap();
        assert!(matches!(store.set("Bad Key", "x"), Err(RepoError::InvalidKey(_))));
    }
}
