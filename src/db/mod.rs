mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::models::FilterConfig;

const FILTERS_KEY: &str = "filters";
const DATASET_PATH_KEY: &str = "dataset_path";

/// Get/set-by-name persistence for small settings values.
pub(crate) trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created settings database");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated settings database");
        }

        Ok(())
    }

    #[cfg(test)]
    fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))?)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read setting '{key}'"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write setting '{key}'"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove setting '{key}'"))?;
        Ok(())
    }
}

// ── Filters ───────────────────────────────────────────────────

/// The persisted filter snapshot, if any. A snapshot that no longer parses is
/// logged and treated as absent.
pub(crate) fn load_filters(store: &dyn KeyValueStore) -> Result<Option<FilterConfig>> {
    let Some(raw) = store.get(FILTERS_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(filters) => Ok(Some(filters)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable filter snapshot");
            Ok(None)
        }
    }
}

pub(crate) fn save_filters(store: &dyn KeyValueStore, filters: &FilterConfig) -> Result<()> {
    let json = serde_json::to_string(filters).context("Failed to serialize filters")?;
    store.set(FILTERS_KEY, &json)
}

pub(crate) fn clear_filters(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(FILTERS_KEY)
}

// ── Dataset ───────────────────────────────────────────────────

pub(crate) fn load_dataset_path(store: &dyn KeyValueStore) -> Result<Option<PathBuf>> {
    Ok(store.get(DATASET_PATH_KEY)?.map(PathBuf::from))
}

pub(crate) fn save_dataset_path(store: &dyn KeyValueStore, path: &Path) -> Result<()> {
    store.set(DATASET_PATH_KEY, &path.to_string_lossy())
}
