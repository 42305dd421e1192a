//! The in-memory master key.

use zeroize::Zeroize;

/// Length of the master key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around a 32-byte master key that automatically zeroes
/// its memory when dropped.
///
/// The key is never persisted; it lives only inside an unlocked
/// session and is wiped the moment that session ends.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to encryption).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}
