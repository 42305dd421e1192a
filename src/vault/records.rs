//! Per-field encryption of entries.
//!
//! On write the password is always sealed and the notes only when they
//! are non-empty; "no notes" is stored as NULL rather than as a fixed
//! size ciphertext of the empty string.  On read both blobs are opened
//! and any authentication failure is returned as-is.

use chrono::{DateTime, Utc};

use super::entry::{NewEntry, PasswordEntry, SealedEntry, StoredEntry};
use crate::crypto::encryption::{decrypt_str, encrypt_str};
use crate::crypto::MasterKey;
use crate::errors::{Result, VaultError};

/// Encrypt the sensitive fields of `entry` under `key`.
pub fn seal_entry<'a>(key: &MasterKey, entry: &'a NewEntry) -> Result<SealedEntry<'a>> {
    let password = encrypt_str(key.as_bytes(), &entry.password)?;
    let notes = if entry.notes.is_empty() {
        None
    } else {
        Some(encrypt_str(key.as_bytes(), &entry.notes)?)
    };

    Ok(SealedEntry {
        title: &entry.title,
        url: &entry.url,
        username: &entry.username,
        category: &entry.category,
        password,
        notes,
    })
}

/// Decrypt a stored row into a full `PasswordEntry`.
pub fn open_entry(key: &MasterKey, stored: &StoredEntry) -> Result<PasswordEntry> {
    let password = decrypt_str(key.as_bytes(), &stored.password)?;
    let notes = match stored.notes.as_deref() {
        Some(blob) if !blob.is_empty() => decrypt_str(key.as_bytes(), blob)?,
        _ => String::new(),
    };

    Ok(PasswordEntry {
        id: stored.id,
        title: stored.title.clone(),
        url: stored.url.clone(),
        username: stored.username.clone(),
        password,
        notes,
        category: stored.category.clone(),
        created_at: parse_timestamp(&stored.created_at)?,
        updated_at: parse_timestamp(&stored.updated_at)?,
    })
}

/// Parse a stored RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VaultError::CorruptEntry(format!("invalid timestamp '{value}': {e}")))
}
