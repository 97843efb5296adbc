//! Generic row CRUD over JSON records.
//!
//! Every record lives in one of a few logical tables, keyed by a string, and
//! scoped to a single shared space. Writes are whole-row upserts: the last
//! write wins, there is no versioning or locking across devices.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::Config;
use crate::error::{CoreError, StoreError};

/// Logical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Day plans keyed by ISO date
    Plans,
    /// Day logs keyed by ISO date
    Logs,
    /// Singleton settings record
    Settings,
    /// Tasks keyed by id
    Tasks,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Plans => "plans",
            Table::Logs => "logs",
            Table::Settings => "settings",
            Table::Tasks => "tasks",
        }
    }
}

/// Row CRUD client for one space.
pub trait RowStore {
    /// The space every call is scoped to.
    fn space(&self) -> &str;

    fn get(&self, table: Table, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// All rows in a table, ordered by key.
    fn list(&self, table: Table) -> Result<Vec<(String, serde_json::Value)>, StoreError>;

    /// Insert or overwrite a row.
    fn upsert(&self, table: Table, key: &str, row: &serde_json::Value) -> Result<(), StoreError>;

    /// Delete a row. Returns whether it existed.
    fn delete(&self, table: Table, key: &str) -> Result<bool, StoreError>;
}

const SCHEMA_VERSION: i32 = 1;

/// SQLite-backed row store.
pub struct SqliteRowStore {
    conn: Connection,
    space: String,
}

impl SqliteRowStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path, space: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn,
            space: space.into(),
        };
        store.migrate()?;
        tracing::debug!(path = %path.display(), space = %store.space, "row store opened");
        Ok(store)
    }

    /// Open the database named by the configuration.
    pub fn open_default(config: &Config) -> Result<Self, CoreError> {
        let path = config.database_path()?;
        Ok(Self::open(&path, config.space.clone())?)
    }

    /// Open an in-memory database.
    pub fn open_memory(space: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            space: space.into(),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS rows (
                    space       TEXT NOT NULL,
                    tbl         TEXT NOT NULL,
                    key         TEXT NOT NULL,
                    data        TEXT NOT NULL,
                    updated_at  TEXT NOT NULL,
                    PRIMARY KEY (space, tbl, key)
                );

                CREATE INDEX IF NOT EXISTS idx_rows_space_tbl ON rows(space, tbl);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        tracing::info!(version = SCHEMA_VERSION, "row store schema migrated");
        Ok(())
    }

    fn decode(table: Table, key: &str, data: &str) -> Result<serde_json::Value, StoreError> {
        serde_json::from_str(data).map_err(|e| StoreError::CorruptRow {
            table: table.as_str().to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

impl RowStore for SqliteRowStore {
    fn space(&self) -> &str {
        &self.space
    }

    fn get(&self, table: Table, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM rows WHERE space = ?1 AND tbl = ?2 AND key = ?3",
                params![self.space, table.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|d| Self::decode(table, key, &d)).transpose()
    }

    fn list(&self, table: Table) -> Result<Vec<(String, serde_json::Value)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT key, data FROM rows WHERE space = ?1 AND tbl = ?2 ORDER BY key",
        )?;
        let rows = stmt.query_map(params![self.space, table.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, data) = row?;
            let value = Self::decode(table, &key, &data)?;
            out.push((key, value));
        }
        Ok(out)
    }

    fn upsert(&self, table: Table, key: &str, row: &serde_json::Value) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO rows (space, tbl, key, data, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(space, tbl, key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at",
            params![
                self.space,
                table.as_str(),
                key,
                row.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, table: Table, key: &str) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "DELETE FROM rows WHERE space = ?1 AND tbl = ?2 AND key = ?3",
            params![self.space, table.as_str(), key],
        )?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upsert_is_last_write_wins() {
        let store = SqliteRowStore::open_memory("home").unwrap();
        store.upsert(Table::Plans, "2026-10-17", &json!({"v": 1})).unwrap();
        store.upsert(Table::Plans, "2026-10-17", &json!({"v": 2})).unwrap();
        assert_eq!(
            store.get(Table::Plans, "2026-10-17").unwrap(),
            Some(json!({"v": 2}))
        );
        assert_eq!(store.list(Table::Plans).unwrap().len(), 1);
    }

    #[test]
    fn tables_and_spaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.db");
        let home = SqliteRowStore::open(&path, "home").unwrap();
        home.upsert(Table::Tasks, "a", &json!({"title": "x"})).unwrap();
        assert!(home.get(Table::Plans, "a").unwrap().is_none());

        let other = SqliteRowStore::open(&path, "cabin").unwrap();
        assert!(other.get(Table::Tasks, "a").unwrap().is_none());
        assert!(other.list(Table::Tasks).unwrap().is_empty());
    }

    #[test]
    fn list_orders_by_key_and_delete_reports_existence() {
        let store = SqliteRowStore::open_memory("home").unwrap();
        store.upsert(Table::Logs, "2026-10-17", &json!({})).unwrap();
        store.upsert(Table::Logs, "2026-10-15", &json!({})).unwrap();
        let keys: Vec<_> = store
            .list(Table::Logs)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["2026-10-15", "2026-10-17"]);

        assert!(store.delete(Table::Logs, "2026-10-15").unwrap());
        assert!(!store.delete(Table::Logs, "2026-10-15").unwrap());
    }

    #[test]
    fn reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.db");
        {
            let store = SqliteRowStore::open(&path, "home").unwrap();
            store.upsert(Table::Settings, "settings", &json!({"child_name": "Ada"})).unwrap();
        }
        let store = SqliteRowStore::open(&path, "home").unwrap();
        assert_eq!(
            store.get(Table::Settings, "settings").unwrap(),
            Some(json!({"child_name": "Ada"}))
        );
    }
}
