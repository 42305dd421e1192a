//! Vault module — the password vault core.
//!
//! This module provides:
//! - Entry types: plaintext, sealed and stored forms (`entry`)
//! - Per-field encryption of passwords and notes (`records`)
//! - Encrypted export/import files (`transfer`)
//! - The `Vault` lifecycle and session operations (`manager`)

pub mod entry;
pub mod manager;
pub mod records;
pub mod transfer;

// Re-export the most commonly used items.
pub use entry::{EntrySummary, NewEntry, PasswordEntry, SearchParams, SortField, StoredEntry};
pub use manager::{Vault, VaultState};
