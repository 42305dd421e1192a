//! Database schema for the vault file.

use rusqlite::Connection;

use crate::audit::AuditLog;
use crate::errors::Result;

const CONFIG_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value BLOB
    );";

const PASSWORDS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS passwords (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT NOT NULL CHECK (title <> ''),
        url        TEXT NOT NULL DEFAULT '',
        username   TEXT NOT NULL DEFAULT '',
        password   BLOB NOT NULL,
        notes      BLOB,
        category   TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_passwords_title ON passwords(title);
    CREATE INDEX IF NOT EXISTS idx_passwords_category ON passwords(category);";

/// Create every table and index that does not exist yet.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(CONFIG_TABLE)?;
    conn.execute_batch(PASSWORDS_TABLE)?;
    AuditLog::new(conn).ensure_table()?;
    Ok(())
}
