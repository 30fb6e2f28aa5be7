//! Data-key envelope: rotation, wrapping, and unwrapping.
//!
//! `Sealed` is the triple {secret, nonce, ciphertext} that always
//! changes together.  Rotation builds a complete new `Sealed` from the
//! plaintext before the caller swaps it in, so a failure mid-rotation
//! can never leave a ciphertext paired with the wrong key or nonce.
//!
//! The data key is wrapped (encrypted under the passphrase-derived
//! wrapping key) only at save time; unwrapping happens at open.  A
//! wrong passphrase surfaces as the same `DecryptionFailed` as a
//! corrupted ciphertext — the caller learns nothing beyond "it did not
//! decrypt".

use rand::TryRngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::{self, NONCE_LEN, TAG_LEN};
use crate::crypto::keys::{DataKey, WrappingKey, KEY_LEN};
use crate::errors::{CredVaultError, Result};

/// Length of a wrapped data key: 32 key bytes + 16-byte GCM tag.
pub const WRAPPED_SECRET_LEN: usize = KEY_LEN + TAG_LEN;

/// The current data key, its nonce, and the ciphertext they produced.
pub(crate) struct Sealed {
    secret: DataKey,
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Sealed {
    /// Encrypt `plaintext` under a fresh random key and nonce.
    ///
    /// This is the rotation primitive: every mutating vault operation
    /// and every save builds a new `Sealed` this way, so each
    /// encryption ever performed uses a never-before-used (key, nonce)
    /// pair.
    pub fn seal(plaintext: &[u8]) -> Result<Self> {
        let secret = DataKey::generate()?;
        let nonce = generate_nonce()?;
        let ciphertext = encryption::seal(secret.as_bytes(), &nonce, plaintext)?;
        Ok(Self {
            secret,
            nonce,
            ciphertext,
        })
    }

    /// Reassemble a `Sealed` from parts read from disk.  No
    /// re-encryption happens here; the ciphertext is held as-is.
    pub fn from_parts(secret: DataKey, nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            secret,
            nonce,
            ciphertext,
        }
    }

    /// Decrypt the payload transiently.
    ///
    /// The buffer is zeroed when dropped, which every caller does
    /// before returning — on success and on error alike.
    pub fn open_payload(&self) -> Result<Zeroizing<Vec<u8>>> {
        encryption::open(self.secret.as_bytes(), &self.nonce, &self.ciphertext).map(Zeroizing::new)
    }

    /// Encrypt the data key under `wrapping` with a fresh wrap nonce.
    pub fn wrap(&self, wrapping: &WrappingKey) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
        let wrap_nonce = generate_nonce()?;
        let wrapped = encryption::seal(wrapping.as_bytes(), &wrap_nonce, self.secret.as_bytes())?;
        Ok((wrap_nonce, wrapped))
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    #[cfg(test)]
    pub fn secret_bytes(&self) -> &[u8; KEY_LEN] {
        self.secret.as_bytes()
    }

    /// Replace the data key with zeroes, invalidating the envelope.
    /// Every subsequent decrypt fails with `DecryptionFailed`.
    #[cfg(test)]
    pub fn invalidate_secret(&mut self) {
        self.secret = DataKey::new([0u8; KEY_LEN]);
    }
}

/// Decrypt a wrapped data key read from disk.
pub(crate) fn unwrap_secret(
    wrapping: &WrappingKey,
    wrap_nonce: &[u8; NONCE_LEN],
    wrapped: &[u8],
) -> Result<DataKey> {
    let bytes = Zeroizing::new(encryption::open(wrapping.as_bytes(), wrap_nonce, wrapped)?);
    let mut key: [u8; KEY_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CredVaultError::DecryptionFailed)?;
    let secret = DataKey::new(key);
    key.zeroize();
    Ok(secret)
}

/// Generate a random 12-byte AEAD nonce from OS entropy.
pub(crate) fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CredVaultError::RandomSource(format!("OS entropy unavailable: {e}")))?;
    Ok(nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::derive_wrapping_key;

    #[test]
    fn seal_then_open_round_trips() {
        let sealed = Sealed::seal(b"payload bytes").unwrap();
        assert_eq!(sealed.open_payload().unwrap().as_slice(), b"payload bytes");
    }

    #[test]
    fn resealing_rotates_key_and_nonce() {
        let first = Sealed::seal(b"same payload").unwrap();
        let second = Sealed::seal(b"same payload").unwrap();
        assert_ne!(first.secret_bytes(), second.secret_bytes());
        assert_ne!(first.nonce(), second.nonce());
        assert_ne!(first.ciphertext(), second.ciphertext());
    }

    #[test]
    fn invalidated_secret_fails_to_open() {
        let mut sealed = Sealed::seal(b"payload").unwrap();
        sealed.invalidate_secret();
        assert!(matches!(
            sealed.open_payload(),
            Err(CredVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn wrap_then_unwrap_recovers_the_secret() {
        let sealed = Sealed::seal(b"payload").unwrap();
        let salt = [7u8; 32];
        let wrapping = derive_wrapping_key(b"passphrase", &salt).unwrap();

        let (wrap_nonce, wrapped) = sealed.wrap(&wrapping).unwrap();
        assert_eq!(wrapped.len(), WRAPPED_SECRET_LEN);

        let recovered = unwrap_secret(&wrapping, &wrap_nonce, &wrapped).unwrap();
        assert_eq!(recovered.as_bytes(), sealed.secret_bytes());
    }

    #[test]
    fn unwrap_with_wrong_passphrase_fails_uniformly() {
        let sealed = Sealed::seal(b"payload").unwrap();
        let salt = [7u8; 32];
        let wrapping = derive_wrapping_key(b"passphrase", &salt).unwrap();
        let (wrap_nonce, wrapped) = sealed.wrap(&wrapping).unwrap();

        let wrong = derive_wrapping_key(b"not the passphrase", &salt).unwrap();
        assert!(matches!(
            unwrap_secret(&wrong, &wrap_nonce, &wrapped),
            Err(CredVaultError::DecryptionFailed)
        ));
    }
}
