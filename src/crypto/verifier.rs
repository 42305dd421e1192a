//! Master-password verification through a test vector.
//!
//! At vault creation a fixed, public plaintext is encrypted under the
//! master key and stored.  Unlocking re-derives a candidate key and
//! tries to decrypt that blob: a valid GCM tag is the proof that the
//! password was right.  The password itself is never stored, and a
//! wrong password cannot be told apart from a corrupted test vector.

use super::encryption::{decrypt, encrypt};
use super::keys::MasterKey;
use crate::errors::{Result, VaultError};

/// The known plaintext sealed into every test vector.
pub const TEST_VECTOR_PLAINTEXT: &[u8] = b"passvault integrity check";

/// Encrypt the known plaintext under `key`.
pub fn create_test_vector(key: &MasterKey) -> Result<Vec<u8>> {
    encrypt(key.as_bytes(), TEST_VECTOR_PLAINTEXT)
}

/// Check a candidate key against a stored test vector.
///
/// Any authentication failure is reported as `InvalidCredential`.  The
/// decrypted content is deliberately not compared.
pub fn verify_key(key: &MasterKey, test_vector: &[u8]) -> Result<()> {
    match decrypt(key.as_bytes(), test_vector) {
        Ok(_) => Ok(()),
        Err(VaultError::AuthenticationFailure) => Err(VaultError::InvalidCredential),
        Err(e) => Err(e),
    }
}
