//! Audit log — operation history stored alongside the vault.
//!
//! Every vault operation (create, unlock, add, delete, export, ...) is
//! recorded in the `audit_log` table of the vault database.  Entries hold
//! the action, the affected entry id and a short detail string; never a
//! password, note or key.
//!
//! Writing is fire-and-forget: a failed insert is traced and otherwise
//! ignored so auditing can never break the operation being audited.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::warn;

use crate::errors::{Result, VaultError};
use crate::storage::{format_timestamp, timestamp_now};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub resource_id: Option<i64>,
    pub details: Option<String>,
}

/// Audit log view over an open vault connection.
pub struct AuditLog<'c> {
    conn: &'c Connection,
}

impl<'c> AuditLog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create the table if it doesn't exist.
    pub fn ensure_table(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                action      TEXT NOT NULL,
                resource_id INTEGER,
                details     TEXT,
                created_at  TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Record an operation. Errors are traced, never returned.
    pub fn log(&self, action: &str, resource_id: Option<i64>, details: Option<&str>) {
        let now = timestamp_now();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (action, resource_id, details, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![action, resource_id, details, now],
        ) {
            warn!(action, error = %e, "failed to write audit entry");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_text = since.map(format_timestamp);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, created_at, action, resource_id, details
                 FROM audit_log
                 WHERE ?1 IS NULL OR created_at >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultError::Audit(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_text, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    action: row.get(2)?,
                    resource_id: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| VaultError::Audit(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultError::Audit(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_log() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        AuditLog::new(&conn).ensure_table().unwrap();
        conn
    }

    #[test]
    fn log_and_query_roundtrip() {
        let conn = open_log();
        let audit = AuditLog::new(&conn);

        audit.log("add", Some(1), None);
        audit.log("add", Some(2), None);
        audit.log("delete", Some(1), None);

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].action, "delete");
        assert_eq!(entries[0].resource_id, Some(1));
        assert_eq!(entries[1].action, "add");
        assert_eq!(entries[2].action, "add");
    }

    #[test]
    fn query_with_limit() {
        let conn = open_log();
        let audit = AuditLog::new(&conn);

        for i in 0..10 {
            audit.log("add", Some(i), None);
        }

        let entries = audit.query(3, None).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn query_with_since_filter() {
        let conn = open_log();
        let audit = AuditLog::new(&conn);

        audit.log("unlock", None, None);

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(audit.query(10, Some(past)).unwrap().len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(audit.query(10, Some(future)).unwrap().is_empty());
    }

    #[test]
    fn log_records_details() {
        let conn = open_log();
        let audit = AuditLog::new(&conn);

        audit.log("export", None, Some("3 entries"));

        let entries = audit.query(1, None).unwrap();
        assert_eq!(entries[0].action, "export");
        assert!(entries[0].resource_id.is_none());
        assert_eq!(entries[0].details.as_deref(), Some("3 entries"));
    }

    #[test]
    fn log_without_table_does_not_panic() {
        let conn = Connection::open_in_memory().unwrap();
        AuditLog::new(&conn).log("add", Some(1), None);
    }
}
