//! AES-256-GCM authenticated encryption.
//!
//! Unlike schemes that generate a nonce per call, `seal` and `open`
//! take the nonce explicitly.  The envelope layer owns nonce lifetimes:
//! every nonce is paired with a brand-new random key, so a (key, nonce)
//! pair can never repeat across encryptions.
//!
//! The authentication tag covers the whole payload — any bit flip in
//! ciphertext, key, or nonce makes `open` fail instead of returning
//! corrupted plaintext.  That failure is the sole mechanism by which a
//! wrong passphrase or an invalidated data key is detected.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::errors::{CredVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a 32-byte `key` and 12-byte `nonce`.
pub fn seal(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and authenticate data produced by `seal`.
///
/// Fails with `DecryptionFailed` on any authentication failure; the
/// error carries no detail about which input was wrong.
pub fn open(key: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    // A valid payload always carries at least the auth tag.
    if ciphertext.len() < TAG_LEN {
        return Err(CredVaultError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CredVaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CredVaultError::DecryptionFailed)
}
