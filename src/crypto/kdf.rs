//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The parameters are fixed for every vault: changing
//! them would make existing vaults impossible to unlock.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use super::encryption::SALT_LEN;
use super::keys::{MasterKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Memory cost in KiB (64 MiB).
pub const ARGON2_MEMORY_KIB: u32 = 64 * 1024;

/// Number of passes over memory.
pub const ARGON2_ITERATIONS: u32 = 3;

/// Parallelism lanes.
pub const ARGON2_PARALLELISM: u32 = 4;

/// Derive the 32-byte master key from a password and the vault salt.
///
/// The same password + salt always produce the same key.  The only
/// failure mode is a salt of the wrong length.
pub fn derive_master_key(password: &[u8], salt: &[u8]) -> Result<MasterKey> {
    if salt.len() != SALT_LEN {
        return Err(VaultError::KeyDerivationFailed(format!(
            "salt must be exactly {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let master_key = MasterKey::new(key);
    key.zeroize();
    Ok(master_key)
}
