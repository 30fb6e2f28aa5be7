//! Key wrapper types that zero their memory on drop.
//!
//! Two keys exist in this crate and they are deliberately kept apart:
//!
//! - `WrappingKey` — ephemeral, derived on demand from passphrase + salt
//!   (Argon2id).  Only ever encrypts the data key.
//! - `DataKey` — the 256-bit "secret".  The only key that ever touches
//!   credential bytes.  Replaced with fresh random bytes on every
//!   rotation, so no (key, nonce) pair is ever reused.

use rand::TryRngCore;
use zeroize::Zeroize;

use crate::errors::{CredVaultError, Result};

/// Length of both keys in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// The passphrase-derived key that wraps the data key for persistence.
///
/// Never written to disk and never used on credential plaintext.
/// Zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct WrappingKey {
    bytes: [u8; KEY_LEN],
}

impl WrappingKey {
    /// Create a new `WrappingKey` from raw derived bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the AEAD layer).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// The data-encryption key ("secret") for the credential ciphertext.
///
/// Exists only to encrypt and decrypt the serialized credential map.
/// Zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DataKey {
    bytes: [u8; KEY_LEN],
}

impl DataKey {
    /// Create a `DataKey` from raw bytes (e.g. after unwrapping).
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random data key from OS entropy.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CredVaultError::RandomSource(format!("OS entropy unavailable: {e}")))?;
        Ok(Self { bytes })
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
