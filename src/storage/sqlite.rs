//! SQLite implementation of the `Storage` trait.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{schema, timestamp_now, Storage};
use crate::audit::{AuditEntry, AuditLog};
use crate::errors::Result;
use crate::vault::entry::{EntrySummary, SealedEntry, SearchParams, StoredEntry};
use crate::vault::records::parse_timestamp;

const SUMMARY_COLUMNS: &str = "id, title, url, username, category, created_at, updated_at";

const FULL_COLUMNS: &str =
    "id, title, url, username, category, password, notes, created_at, updated_at";

/// Vault storage in a single SQLite database file.
pub struct SqliteStorage {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStorage {
    /// Open (or create) the vault database at `path`.
    ///
    /// Missing parent directories are created and, on Unix, the file is
    /// restricted to owner-only access.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), "vault database opened");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for SqliteStorage {
    fn get_config(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_config_batch(&mut self, values: &[(&str, &[u8])]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in values {
            tx.execute(
                "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_entry(&mut self, entry: &SealedEntry<'_>) -> Result<i64> {
        let now = timestamp_now();
        self.conn.execute(
            "INSERT INTO passwords (title, url, username, password, notes, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                entry.title,
                entry.url,
                entry.username,
                entry.password,
                entry.notes,
                entry.category,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_entry(&self, id: i64) -> Result<Option<StoredEntry>> {
        let sql = format!("SELECT {FULL_COLUMNS} FROM passwords WHERE id = ?1");
        let entry = self
            .conn
            .query_row(&sql, [id], stored_from_row)
            .optional()?;
        Ok(entry)
    }

    fn update_entry(&mut self, id: i64, entry: &SealedEntry<'_>) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE passwords
             SET title = ?1, url = ?2, username = ?3, password = ?4, notes = ?5,
                 category = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                entry.title,
                entry.url,
                entry.username,
                entry.password,
                entry.notes,
                entry.category,
                timestamp_now(),
                id
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_entry(&mut self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM passwords WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    fn search_entries(&self, search: &SearchParams) -> Result<Vec<EntrySummary>> {
        let mut sql = format!("SELECT {SUMMARY_COLUMNS} FROM passwords WHERE 1=1");
        let mut args: Vec<Value> = Vec::new();

        if let Some(keyword) = search.keyword.as_deref().filter(|k| !k.is_empty()) {
            let pattern = format!("%{}%", escape_like(keyword));
            sql.push_str(
                " AND (title LIKE ? ESCAPE '\\' OR url LIKE ? ESCAPE '\\' OR username LIKE ? ESCAPE '\\')",
            );
            args.extend(std::iter::repeat(Value::Text(pattern)).take(3));
        }

        if let Some(category) = search.category.as_deref().filter(|c| !c.is_empty()) {
            sql.push_str(" AND category = ?");
            args.push(Value::Text(category.to_string()));
        }

        let direction = if search.descending { "DESC" } else { "ASC" };
        sql.push_str(&format!(
            " ORDER BY {} {direction}, id ASC",
            search.sort_by.column()
        ));

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        if search.limit > 0 || search.offset > 0 {
            let limit = if search.limit > 0 {
                i64::try_from(search.limit).unwrap_or(i64::MAX)
            } else {
                -1
            };
            sql.push_str(" LIMIT ? OFFSET ?");
            args.push(Value::Integer(limit));
            args.push(Value::Integer(
                i64::try_from(search.offset).unwrap_or(i64::MAX),
            ));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), summary_row)?;

        let mut entries = Vec::new();
        for row in rows {
            let summary: EntrySummary = row?.try_into()?;
            entries.push(summary);
        }
        Ok(entries)
    }

    fn export_entries(&self) -> Result<Vec<StoredEntry>> {
        let sql = format!("SELECT {FULL_COLUMNS} FROM passwords ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], stored_from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn import_entries(&mut self, entries: &[StoredEntry]) -> Result<usize> {
        // Dropping the transaction without commit rolls every insert back.
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO passwords (title, url, username, password, notes, category, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.title,
                    entry.url,
                    entry.username,
                    entry.password,
                    entry.notes,
                    entry.category,
                    entry.created_at,
                    entry.updated_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(entries.len())
    }

    fn log_event(&self, action: &str, resource_id: Option<i64>, details: Option<&str>) {
        AuditLog::new(&self.conn).log(action, resource_id, details);
    }

    fn audit_events(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        AuditLog::new(&self.conn).query(limit, since)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        debug!(path = %self.path.display(), "vault database closed");
        Ok(())
    }
}

/// Escape LIKE wildcards so a keyword matches literally (used with `ESCAPE '\'`).
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Metadata columns of a row, before timestamp parsing.
struct SummaryRow {
    id: i64,
    title: String,
    url: String,
    username: String,
    category: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SummaryRow> for EntrySummary {
    type Error = crate::errors::VaultError;

    fn try_from(row: SummaryRow) -> Result<Self> {
        Ok(EntrySummary {
            id: row.id,
            title: row.title,
            url: row.url,
            username: row.username,
            category: row.category,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn summary_row(row: &Row<'_>) -> rusqlite::Result<SummaryRow> {
    Ok(SummaryRow {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        username: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredEntry> {
    Ok(StoredEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        username: row.get(3)?,
        category: row.get(4)?,
        password: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
