//! Persistence for the vault.
//!
//! The `Storage` trait is everything the vault core needs from a store:
//! byte-exact configuration values, entry CRUD and search, bulk export,
//! transactional import and the audit trail.  The store has no
//! cryptographic responsibility; it only ever sees ciphertext for the
//! password and notes fields.
//!
//! `SqliteStorage` is the only implementation shipped.

pub mod schema;
pub mod sqlite;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::audit::AuditEntry;
use crate::errors::Result;
use crate::vault::entry::{EntrySummary, SealedEntry, SearchParams, StoredEntry};

pub use sqlite::SqliteStorage;

/// Storage backend interface for the vault.
///
/// Implementations must ensure:
/// - Configuration values round-trip byte-exact
/// - Ids are assigned by the store and never reused for another entry
/// - `import_entries` is all-or-nothing
pub trait Storage {
    /// Read a named configuration value.
    fn get_config(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write several configuration values in one transaction.
    fn put_config_batch(&mut self, values: &[(&str, &[u8])]) -> Result<()>;

    /// Insert a new entry and return its assigned id.
    fn insert_entry(&mut self, entry: &SealedEntry<'_>) -> Result<i64>;

    /// Fetch a single raw entry.
    fn get_entry(&self, id: i64) -> Result<Option<StoredEntry>>;

    /// Replace an entry's fields.  Returns `false` if no row has that id.
    fn update_entry(&mut self, id: i64, entry: &SealedEntry<'_>) -> Result<bool>;

    /// Delete an entry.  Returns `false` if no row has that id.
    fn delete_entry(&mut self, id: i64) -> Result<bool>;

    /// Filtered, ordered, paginated metadata listing.
    fn search_entries(&self, params: &SearchParams) -> Result<Vec<EntrySummary>>;

    /// Metadata for every entry, ordered by title.
    fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        self.search_entries(&SearchParams::default())
    }

    /// Every entry as a raw row, blobs included.
    fn export_entries(&self) -> Result<Vec<StoredEntry>>;

    /// Insert every row as a new entry inside a single transaction.
    ///
    /// Ids in `entries` are ignored; timestamps are kept.  On any
    /// failure nothing is inserted.
    fn import_entries(&mut self, entries: &[StoredEntry]) -> Result<usize>;

    /// Append to the audit trail.  Never fails the caller.
    fn log_event(&self, action: &str, resource_id: Option<i64>, details: Option<&str>);

    /// Most recent audit events first.
    fn audit_events(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>>;

    /// Release the underlying connection.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Current time in the store's fixed textual format.
///
/// Example: `2024-01-02T03:04:05.678Z`.  Fixed width, so text order is
/// chronological order.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Format a timestamp in the store's fixed textual format.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
