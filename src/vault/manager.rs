//! The vault lifecycle and the operations of an unlocked session.
//!
//! `Vault` owns the storage and, while unlocked, a `Session` holding the
//! master key.  State moves like this:
//!
//! ```text
//! Uninitialized --create_master_password--> Unlocked
//! Locked        --unlock(ok)--------------> Unlocked
//! Locked        --unlock(wrong)-----------> Locked
//! Unlocked      --lock--------------------> Locked
//! any           --close-------------------> (consumed)
//! ```
//!
//! Every data operation checks the session first and fails with
//! `NotUnlocked` before touching storage.  Dropping the session drops
//! the `MasterKey`, which zeroes its bytes.

use std::cell::Cell;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::entry::{EntrySummary, NewEntry, PasswordEntry, SearchParams};
use super::records::{open_entry, seal_entry};
use super::transfer::{open_export, seal_export, write_export_file};
use crate::audit::AuditEntry;
use crate::crypto::{create_test_vector, derive_master_key, generate_salt, verify_key, MasterKey};
use crate::errors::{Result, VaultError};
use crate::generator::{self, GeneratorOptions};
use crate::storage::{SqliteStorage, Storage};

/// Configuration key holding the KDF salt.
pub const SALT_KEY: &str = "salt";

/// Configuration key holding the encrypted test vector.
pub const TEST_VECTOR_KEY: &str = "test_vector";

/// Where a vault is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No salt has been stored yet.
    Uninitialized,
    Locked,
    Unlocked,
}

impl std::fmt::Display for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VaultState::Uninitialized => "uninitialized",
            VaultState::Locked => "locked",
            VaultState::Unlocked => "unlocked",
        };
        f.write_str(label)
    }
}

/// An authenticated session.  Exists only while the vault is unlocked.
struct Session {
    key: MasterKey,
}

/// A password vault over some `Storage`.
///
/// All transitions take `&mut self`, so a single `Vault` value can never
/// be locked while a read is still using its key.  To share one across
/// threads, wrap it in a `Mutex`.
pub struct Vault<S: Storage = SqliteStorage> {
    storage: S,
    session: Option<Session>,
    initialized: bool,
    last_activity: Cell<DateTime<Utc>>,
}

impl Vault<SqliteStorage> {
    /// Open (or create) the vault database at `path`.  The vault starts
    /// out Locked, or Uninitialized if no master password exists yet.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_storage(SqliteStorage::open(path)?)
    }
}

impl<S: Storage> Vault<S> {
    /// Wrap an already opened store.
    pub fn with_storage(storage: S) -> Result<Self> {
        let initialized = storage.get_config(SALT_KEY)?.is_some();
        Ok(Self {
            storage,
            session: None,
            initialized,
            last_activity: Cell::new(Utc::now()),
        })
    }

    pub fn state(&self) -> VaultState {
        match (&self.session, self.initialized) {
            (Some(_), _) => VaultState::Unlocked,
            (None, true) => VaultState::Locked,
            (None, false) => VaultState::Uninitialized,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_none()
    }

    /// Time of the last successful operation on an unlocked vault.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity.get()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Set up a brand-new vault and unlock it.
    ///
    /// The salt and test vector are written in one transaction.  A vault
    /// that already has a salt is never re-initialized.
    pub fn create_master_password(&mut self, password: &str) -> Result<()> {
        if self.initialized || self.storage.get_config(SALT_KEY)?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        let salt = generate_salt();
        let key = derive_master_key(password.as_bytes(), &salt)?;
        let test_vector = create_test_vector(&key)?;

        self.storage
            .put_config_batch(&[
                (SALT_KEY, salt.as_slice()),
                (TEST_VECTOR_KEY, test_vector.as_slice()),
            ])?;

        self.initialized = true;
        self.session = Some(Session { key });
        self.touch();

        self.storage.log_event("create", None, None);
        info!("vault created");
        Ok(())
    }

    /// Verify `password` against the stored test vector and, on success,
    /// hold the derived key.
    ///
    /// Any previous session is discarded first, so a failed unlock always
    /// leaves the vault Locked.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        self.session = None;

        let salt = self
            .storage
            .get_config(SALT_KEY)?
            .ok_or(VaultError::NotInitialized)?;
        self.initialized = true;

        let key = derive_master_key(password.as_bytes(), &salt)?;

        let Some(test_vector) = self.storage.get_config(TEST_VECTOR_KEY)? else {
            warn!("vault has a salt but no test vector");
            self.storage
                .log_event("unlock-failed", None, Some("missing test vector"));
            return Err(VaultError::InvalidCredential);
        };

        if let Err(e) = verify_key(&key, &test_vector) {
            warn!("unlock failed: invalid master password");
            self.storage.log_event("unlock-failed", None, None);
            return Err(e);
        }

        self.session = Some(Session { key });
        self.touch();

        self.storage.log_event("unlock", None, None);
        info!("vault unlocked");
        Ok(())
    }

    /// Discard the master key.  Locking a locked vault is a no-op.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            info!("vault locked");
        }
    }

    /// Lock, then release the underlying store.
    pub fn close(mut self) -> Result<()> {
        self.lock();
        self.storage.close()?;
        debug!("vault closed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Encrypt and store a new entry, returning its id.
    pub fn add_password(&mut self, entry: &NewEntry) -> Result<i64> {
        let key = self.key()?;
        validate(entry)?;

        let sealed = seal_entry(key, entry)?;
        let id = self.storage.insert_entry(&sealed)?;
        self.touch();

        self.storage.log_event("add", Some(id), None);
        debug!(id, "entry added");
        Ok(id)
    }

    /// Fetch and decrypt a single entry.
    pub fn get_password(&self, id: i64) -> Result<PasswordEntry> {
        let key = self.key()?;
        let stored = self
            .storage
            .get_entry(id)?
            .ok_or(VaultError::EntryNotFound(id))?;
        let entry = open_entry(key, &stored)?;
        self.touch();
        Ok(entry)
    }

    /// Metadata for every entry, ordered by title.  Nothing is decrypted.
    pub fn get_all_passwords(&self) -> Result<Vec<EntrySummary>> {
        self.key()?;
        let entries = self.storage.list_entries()?;
        self.touch();
        Ok(entries)
    }

    /// Replace every field of entry `id`.
    pub fn update_password(&mut self, id: i64, entry: &NewEntry) -> Result<()> {
        let key = self.key()?;
        validate(entry)?;

        let sealed = seal_entry(key, entry)?;
        if !self.storage.update_entry(id, &sealed)? {
            return Err(VaultError::EntryNotFound(id));
        }
        self.touch();

        self.storage.log_event("update", Some(id), None);
        debug!(id, "entry updated");
        Ok(())
    }

    pub fn delete_password(&mut self, id: i64) -> Result<()> {
        self.key()?;
        if !self.storage.delete_entry(id)? {
            return Err(VaultError::EntryNotFound(id));
        }
        self.touch();

        self.storage.log_event("delete", Some(id), None);
        debug!(id, "entry deleted");
        Ok(())
    }

    /// Filtered, sorted, paginated metadata.  Nothing is decrypted.
    pub fn search_passwords(&self, params: &SearchParams) -> Result<Vec<EntrySummary>> {
        self.key()?;
        let entries = self.storage.search_entries(params)?;
        self.touch();
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Write every entry to an encrypted export file at `path`.
    ///
    /// Overwrites an existing file; callers that care check first.
    pub fn export_vault(&self, path: &Path) -> Result<usize> {
        let key = self.key()?;
        let entries = self.storage.export_entries()?;
        let contents = seal_export(key, &entries)?;
        write_export_file(path, &contents)?;
        self.touch();

        let count = entries.len();
        self.storage
            .log_event("export", None, Some(&format!("{count} entries")));
        info!(count, path = %path.display(), "vault exported");
        Ok(count)
    }

    /// Add every entry of an export file as a new entry.
    ///
    /// Existing entries are untouched.  Either all entries are imported
    /// or none are.
    pub fn import_vault(&mut self, path: &Path) -> Result<usize> {
        let key = self.key()?;
        let contents = Zeroizing::new(fs::read_to_string(path)?);
        let entries = open_export(key, &contents)?;

        let count = self.storage.import_entries(&entries)?;
        self.touch();

        self.storage
            .log_event("import", None, Some(&format!("{count} entries")));
        info!(count, path = %path.display(), "vault imported");
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Misc
    // ------------------------------------------------------------------

    /// Most recent audit events first.
    pub fn audit_log(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        self.key()?;
        self.storage.audit_events(limit, since)
    }

    /// Generate a random password.  Works in any state.
    pub fn generate_password(&self, options: &GeneratorOptions) -> Result<Zeroizing<String>> {
        generator::generate_password(options)
    }

    fn key(&self) -> Result<&MasterKey> {
        self.session
            .as_ref()
            .map(|session| &session.key)
            .ok_or(VaultError::NotUnlocked)
    }

    fn touch(&self) {
        self.last_activity.set(Utc::now());
    }
}

impl<S: Storage> std::fmt::Debug for Vault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("state", &self.state())
            .field("last_activity", &self.last_activity.get())
            .finish_non_exhaustive()
    }
}

fn validate(entry: &NewEntry) -> Result<()> {
    if entry.title.trim().is_empty() {
        return Err(VaultError::InvalidEntry("title must not be empty".into()));
    }
    Ok(())
}
