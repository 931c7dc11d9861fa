// lectio-core/src/vault/mod.rs

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub mod schema;

// ════════════════════════════════════════════════════════════════════
// Data types
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingRecord {
    pub id: i64,
    pub session_id: String,
    pub chapter_id: String,
    pub reference: String,
    pub timestamp: i64,
}

// ════════════════════════════════════════════════════════════════════
// Vault
// ════════════════════════════════════════════════════════════════════

/// Local persistent storage: settings (credentials) and reading history.
#[derive(Debug, Clone)]
pub struct Vault {
    conn: Arc<Mutex<Connection>>,
    session_id: String,
    start_time: i64,
}

impl Vault {
    /// Open the Vault at the specified path.
    /// Creates the database file and runs all migrations if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open vault at {}", path.display()))?;

        // WAL mode for better concurrency
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        Self::init(conn)
    }

    /// A throwaway Vault that lives only as long as the process.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Run migrations in order
        conn.execute_batch(schema::MIGRATION_INIT)?;
        conn.execute_batch(schema::MIGRATION_V2)?;

        let vault = Self {
            conn: Arc::new(Mutex::new(conn)),
            session_id: Uuid::new_v4().to_string(),
            start_time: Utc::now().timestamp(),
        };

        vault.start_session()?;

        Ok(vault)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("vault connection lock poisoned"))
    }

    // ────────────────────────────────────────────────────────────────
    // Sessions
    // ────────────────────────────────────────────────────────────────

    fn start_session(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO session (id, start_time) VALUES (?1, ?2)",
            params![self.session_id, self.start_time],
        )?;
        Ok(())
    }

    /// Mark the current session as ended.
    pub fn close_session(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE session SET end_time = ?1 WHERE id = ?2",
            params![Utc::now().timestamp(), self.session_id],
        )?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────
    // Settings
    // ────────────────────────────────────────────────────────────────

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a setting.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────
    // Reading history
    // ────────────────────────────────────────────────────────────────

    /// Log that a chapter was opened.
    pub fn record_reading(&self, chapter_id: &str, reference: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reading (session_id, chapter_id, reference, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.session_id, chapter_id, reference, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Get the last N distinct chapters read (most recent first).
    pub fn recent_readings(&self, limit: usize) -> Result<Vec<ReadingRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT MAX(id), session_id, chapter_id, reference, timestamp
             FROM reading
             GROUP BY chapter_id
             ORDER BY MAX(id) DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ReadingRecord {
                id: row.get(0)?,
                session_id: row.get(1)?,
                chapter_id: row.get(2)?,
                reference: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// The most recent chapter opened, across all sessions.
    pub fn last_reading(&self) -> Result<Option<ReadingRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT id, session_id, chapter_id, reference, timestamp
                 FROM reading ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(ReadingRecord {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        chapter_id: row.get(2)?,
                        reference: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Count chapters opened in the current session.
    pub fn session_reading_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reading WHERE session_id = ?1",
            params![self.session_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
