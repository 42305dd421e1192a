use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Lifecycle errors ---
    #[error("No vault exists yet — create a master password first")]
    NotInitialized,

    #[error("Vault is already initialized — the master password cannot be re-created")]
    AlreadyInitialized,

    #[error("Invalid master password")]
    InvalidCredential,

    #[error("Vault is locked — unlock it before accessing entries")]
    NotUnlocked,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — wrong key or corrupted data")]
    AuthenticationFailure,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Export / import errors ---
    #[error("Invalid vault file: {0}")]
    InvalidVaultFile(String),

    #[error("Export file already exists at {0}")]
    ExportExists(PathBuf),

    // --- Entry errors ---
    #[error("Entry {0} not found")]
    EntryNotFound(i64),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Corrupt entry in database: {0}")]
    CorruptEntry(String),

    // --- Persistence errors ---
    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Audit error: {0}")]
    Audit(String),

    // --- Generator errors ---
    #[error("Password generation failed: {0}")]
    Generator(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
