//! SQLite persistence.
//!
//! Two tables:
//! - `checkins`: one row per completed daily check-in
//! - `kv`: small key/value store for session and flow state

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::checkin::CheckInRecord;
use crate::error::StoreError;

/// Database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(|source| StoreError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: std::path::PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS checkins (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    cigarettes INTEGER NOT NULL,
                    confidence INTEGER NOT NULL,
                    craving INTEGER NOT NULL,
                    streak INTEGER NOT NULL,
                    at TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Record a completed check-in. Returns the row id.
    pub fn record_checkin(
        &self,
        cigarettes: u32,
        confidence: u8,
        craving: u8,
        streak: u32,
        at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO checkins (cigarettes, confidence, craving, streak, at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![cigarettes, confidence, craving, streak, at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent check-ins, newest first.
    pub fn recent_checkins(&self, limit: u32) -> Result<Vec<CheckInRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cigarettes, confidence, craving, streak, at
             FROM checkins ORDER BY at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            let at: String = row.get(5)?;
            let at = DateTime::parse_from_rfc3339(&at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(CheckInRecord {
                id: row.get(0)?,
                cigarettes: row.get(1)?,
                confidence: row.get(2)?,
                craving: row.get(3)?,
                streak: row.get(4)?,
                at,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn record_and_read_back_checkins() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        db.record_checkin(5, 7, 3, 1, now - Duration::days(1)).unwrap();
        db.record_checkin(3, 8, 2, 2, now).unwrap();

        let recent = db.recent_checkins(10).unwrap();
        assert_eq!(recent.len(), 2);
        // Newest first.
        assert_eq!(recent[0].cigarettes, 3);
        assert_eq!(recent[0].streak, 2);
        assert_eq!(recent[1].cigarettes, 5);
    }

    #[test]
    fn recent_checkins_respects_limit() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        for i in 0..5 {
            db.record_checkin(i, 5, 5, i, now + Duration::seconds(i as i64))
                .unwrap();
        }
        assert_eq!(db.recent_checkins(3).unwrap().len(), 3);
    }

    #[test]
    fn corrupt_timestamp_is_a_query_error() {
        let db = Database::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO checkins (cigarettes, confidence, craving, streak, at)
                 VALUES (3, 5, 5, 1, 'not-a-timestamp')",
                [],
            )
            .unwrap();

        let err = db.recent_checkins(10).unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[test]
    fn kv_set_get_overwrite_delete() {
        let db = Database::open_memory().unwrap();

        assert!(db.kv_get("session_user_id").unwrap().is_none());

        db.kv_set("session_user_id", "u-1").unwrap();
        assert_eq!(db.kv_get("session_user_id").unwrap().as_deref(), Some("u-1"));

        db.kv_set("session_user_id", "u-2").unwrap();
        assert_eq!(db.kv_get("session_user_id").unwrap().as_deref(), Some("u-2"));

        db.kv_delete("session_user_id").unwrap();
        assert!(db.kv_get("session_user_id").unwrap().is_none());
    }
}
