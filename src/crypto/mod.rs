//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM envelope encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroizing `MasterKey` wrapper (`keys`)
//! - Test-vector based master-password verification (`verifier`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod verifier;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_key, ...};
pub use encryption::{decrypt, decrypt_str, encrypt, encrypt_str, generate_key_material, generate_salt};
pub use kdf::derive_master_key;
pub use keys::MasterKey;
pub use verifier::{create_test_vector, verify_key};
