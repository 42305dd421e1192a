//! Credential entry types.
//!
//! An entry keeps its title, URL, username and category in the clear.
//! Its password and notes are only ever stored as AES-GCM blobs; the
//! plaintext exists in `NewEntry` / `PasswordEntry` values, which wipe
//! both fields when dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::transfer::{base64_decode, base64_decode_opt, base64_encode, base64_encode_opt};

/// The caller-supplied contents of an entry (used by add and update).
#[derive(Clone, Default)]
pub struct NewEntry {
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    pub category: String,
}

impl NewEntry {
    /// An entry with only a title and a password; chain `with_*` for the rest.
    ///
    /// `NewEntry` implements `Drop`, so struct-update syntax
    /// (`..NewEntry::default()`) is not available.
    pub fn new(title: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: String::new(),
            username: String::new(),
            password: password.into(),
            notes: String::new(),
            category: String::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl Drop for NewEntry {
    fn drop(&mut self) {
        self.password.zeroize();
        self.notes.zeroize();
    }
}

impl std::fmt::Debug for NewEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewEntry")
            .field("title", &self.title)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// A fully decrypted entry, returned when a single entry is fetched by id.
#[derive(Clone)]
pub struct PasswordEntry {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PasswordEntry {
    /// Copy the editable fields into a `NewEntry` (for updates).
    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            title: self.title.clone(),
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            notes: self.notes.clone(),
            category: self.category.clone(),
        }
    }
}

impl Drop for PasswordEntry {
    fn drop(&mut self) {
        self.password.zeroize();
        self.notes.zeroize();
    }
}

impl std::fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("category", &self.category)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Clear-text metadata about an entry (no password, no notes).
///
/// Returned by listing and searching so bulk operations never touch
/// ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub username: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entry with its sensitive fields already encrypted, ready to write.
#[derive(Debug)]
pub struct SealedEntry<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub username: &'a str,
    pub category: &'a str,
    pub password: Vec<u8>,
    /// `None` when the entry has no notes.
    pub notes: Option<Vec<u8>>,
}

/// A raw row as persisted: clear-text fields, encrypted blobs and the
/// store's textual timestamps.
///
/// This is also the record type of the export payload; the blobs travel
/// as base64 strings and are never re-encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Id in the exporting vault.  Ignored on import.
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub category: String,
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub password: Vec<u8>,
    #[serde(
        default,
        serialize_with = "base64_encode_opt",
        deserialize_with = "base64_decode_opt"
    )]
    pub notes: Option<Vec<u8>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Column an entry listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortField {
    #[default]
    Title,
    Url,
    Username,
    Category,
    #[value(name = "created")]
    CreatedAt,
    #[value(name = "updated")]
    UpdatedAt,
}

impl SortField {
    /// The database column backing this sort order.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Url => "url",
            SortField::Username => "username",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

/// Filter, order and pagination for entry searches.
///
/// `limit == 0` means no limit.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Substring matched against title, URL and username.
    pub keyword: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub sort_by: SortField,
    pub descending: bool,
    pub limit: usize,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_builder_fills_every_field() {
        let entry = NewEntry::new("Bank", "hunter2")
            .with_url("https://bank.example")
            .with_username("bob")
            .with_notes("pin 1234")
            .with_category("finance");

        assert_eq!(entry.title, "Bank");
        assert_eq!(entry.password, "hunter2");
        assert_eq!(entry.url, "https://bank.example");
        assert_eq!(entry.username, "bob");
        assert_eq!(entry.notes, "pin 1234");
        assert_eq!(entry.category, "finance");
    }

    #[test]
    fn new_entry_defaults_optional_fields_to_empty() {
        let entry = NewEntry::new("Bank", "hunter2");
        assert!(entry.url.is_empty());
        assert!(entry.username.is_empty());
        assert!(entry.notes.is_empty());
        assert!(entry.category.is_empty());
    }

    #[test]
    fn new_entry_debug_hides_secrets() {
        let entry = NewEntry::new("Bank", "hunter2").with_notes("pin 1234");
        let debug = format!("{entry:?}");
        assert!(debug.contains("Bank"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("pin 1234"));
    }
}
