//! Append-only activity ledger of processed uploads.
//!
//! [`SqliteLedger`] keeps one row per upload in a single SQLite table. Writers
//! are serialized through a mutex around the connection, so concurrent
//! requests never interleave a statement; the order of their rows is
//! unspecified. Rows are never updated or deleted.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, params};
use thiserror::Error;

/// Number of recent uploads shown by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode triggered categories: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// One processed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadEvent {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    /// Network origin of the requester (IP address as text).
    pub origin: String,
    pub location: Option<String>,
    /// Categories scoring above the relevance threshold; `None` when the
    /// document could not be processed.
    pub triggered: Option<Vec<String>>,
}

impl UploadEvent {
    /// An event stamped with the current time.
    pub fn new(filename: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            uploaded_at: Utc::now(),
            origin: origin.into(),
            location: None,
            triggered: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_triggered(mut self, triggered: Option<Vec<String>>) -> Self {
        self.triggered = triggered;
        self
    }
}

/// Aggregate view of the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSummary {
    pub total: u64,
    pub last_upload: Option<DateTime<Utc>>,
    /// Most recent uploads, newest first.
    pub recent: Vec<UploadEvent>,
}

/// Append/query facade over persisted upload events.
pub trait Ledger: Send + Sync {
    fn record(&self, event: &UploadEvent) -> Result<(), LedgerError>;

    /// Totals plus the `limit` most recent events.
    fn summary(&self, limit: usize) -> Result<LedgerSummary, LedgerError>;
}

/// SQLite-backed [`Ledger`].
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteLedger").finish_non_exhaustive()
    }
}

impl SqliteLedger {
    /// Open (or create) a ledger database at `path` with WAL journaling.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::with_connection(conn)
    }

    /// A ledger that lives only as long as the process.
    pub fn in_memory() -> Result<Self, LedgerError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LedgerError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS uploads (
                 id          INTEGER PRIMARY KEY AUTOINCREMENT,
                 filename    TEXT NOT NULL,
                 upload_time INTEGER NOT NULL,
                 ip          TEXT NOT NULL,
                 location    TEXT,
                 triggered   TEXT
             );
             CREATE INDEX IF NOT EXISTS idx_uploads_time ON uploads (upload_time);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Ledger for SqliteLedger {
    fn record(&self, event: &UploadEvent) -> Result<(), LedgerError> {
        let triggered_json = event
            .triggered
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        conn.execute(
            "INSERT INTO uploads (filename, upload_time, ip, location, triggered)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.filename,
                event.uploaded_at.timestamp_millis(),
                event.origin,
                event.location,
                triggered_json
            ],
        )?;
        tracing::debug!(filename = %event.filename, origin = %event.origin, "upload recorded");
        Ok(())
    }

    fn summary(&self, limit: usize) -> Result<LedgerSummary, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;

        let (total, latest): (i64, Option<i64>) = conn.query_row(
            "SELECT COUNT(*), MAX(upload_time) FROM uploads",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT filename, upload_time, ip, location, triggered FROM uploads
             ORDER BY upload_time DESC, id DESC LIMIT ?1",
        )?;
        let recent = stmt
            .query_map(params![limit as i64], |row| {
                let millis: i64 = row.get(1)?;
                let triggered: Option<String> = row.get(4)?;
                Ok(UploadEvent {
                    filename: row.get(0)?,
                    uploaded_at: from_millis(millis),
                    origin: row.get(2)?,
                    location: row.get(3)?,
                    triggered: triggered.and_then(|t| serde_json::from_str(&t).ok()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LedgerSummary {
            total: total.max(0) as u64,
            last_upload: latest.map(from_millis),
            recent,
        })
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_at(filename: &str, secs: i64) -> UploadEvent {
        UploadEvent {
            filename: filename.to_string(),
            uploaded_at: Utc.timestamp_opt(secs, 0).unwrap(),
            origin: "203.0.113.7".to_string(),
            location: None,
            triggered: None,
        }
    }

    #[test]
    fn empty_summary() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let summary = ledger.summary(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(summary, LedgerSummary::default());
    }

    #[test]
    fn record_and_summarize() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger.record(&event_at("a.pdf", 1_700_000_000)).unwrap();
        ledger
            .record(
                &event_at("b.pdf", 1_700_000_500)
                    .with_location(Some("Bandung, West Java, Indonesia".into()))
                    .with_triggered(Some(vec!["Goal 6".into(), "Goal 13".into()])),
            )
            .unwrap();

        let summary = ledger.summary(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(
            summary.last_upload,
            Some(Utc.timestamp_opt(1_700_000_500, 0).unwrap())
        );
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].filename, "b.pdf");
        assert_eq!(
            summary.recent[0].location.as_deref(),
            Some("Bandung, West Java, Indonesia")
        );
        assert_eq!(
            summary.recent[0].triggered,
            Some(vec!["Goal 6".to_string(), "Goal 13".to_string()])
        );
        assert_eq!(summary.recent[1].filename, "a.pdf");
        assert_eq!(summary.recent[1].triggered, None);
    }

    #[test]
    fn empty_triggered_list_round_trips() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger
            .record(&event_at("c.pdf", 10).with_triggered(Some(vec![])))
            .unwrap();
        let summary = ledger.summary(1).unwrap();
        assert_eq!(summary.recent[0].triggered, Some(vec![]));
    }

    #[test]
    fn summary_is_limited_newest_first() {
        let ledger = SqliteLedger::in_memory().unwrap();
        for i in 0..15 {
            ledger.record(&event_at(&format!("{i}.pdf"), 1_000 + i)).unwrap();
        }
        let summary = ledger.summary(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(summary.total, 15);
        assert_eq!(summary.recent.len(), 10);
        assert_eq!(summary.recent[0].filename, "14.pdf");
        assert_eq!(summary.recent[9].filename, "5.pdf");
    }

    #[test]
    fn same_timestamp_orders_by_insertion() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger.record(&event_at("first.pdf", 42)).unwrap();
        ledger.record(&event_at("second.pdf", 42)).unwrap();
        let summary = ledger.summary(2).unwrap();
        assert_eq!(summary.recent[0].filename, "second.pdf");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.record(&event_at("kept.pdf", 99)).unwrap();
        }
        let reopened = SqliteLedger::open(&path).unwrap();
        let summary = reopened.summary(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.recent[0].filename, "kept.pdf");
    }

    #[test]
    fn concurrent_writers_do_not_lose_rows() {
        let ledger = std::sync::Arc::new(SqliteLedger::in_memory().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = std::sync::Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        ledger
                            .record(&UploadEvent::new(format!("t{t}-{i}.pdf"), "198.51.100.1"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(ledger.summary(1).unwrap().total, 200);
    }
}
