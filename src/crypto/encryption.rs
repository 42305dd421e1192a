//! AES-256-GCM envelope encryption.
//!
//! Each call to `encrypt` draws a fresh random 12-byte nonce from the OS
//! and prepends it to the ciphertext.  `decrypt` splits the nonce back
//! out before decrypting.  No associated data is used.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Length of the per-vault salt in bytes.
pub const SALT_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext || tag).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt a blob produced by `encrypt`.
///
/// A blob shorter than the nonce, a wrong key and a tampered blob all
/// surface the same `AuthenticationFailure`.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LEN {
        return Err(VaultError::AuthenticationFailure);
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailure)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::AuthenticationFailure)
}

/// Encrypt a UTF-8 string.
pub fn encrypt_str(key: &[u8], plaintext: &str) -> Result<Vec<u8>> {
    encrypt(key, plaintext.as_bytes())
}

/// Decrypt a blob back into a UTF-8 string.
///
/// Bytes that fail UTF-8 validation are treated like any other
/// authentication failure; they cannot come out of `encrypt_str`.
pub fn decrypt_str(key: &[u8], blob: &[u8]) -> Result<String> {
    let bytes = decrypt(key, blob)?;
    String::from_utf8(bytes).map_err(|e| {
        use zeroize::Zeroize;
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::AuthenticationFailure
    })
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Fill a buffer of `len` bytes from the OS random source.
pub fn generate_key_material(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
