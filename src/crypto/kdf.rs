//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that makes offline brute force against
//! a stolen vault file expensive.  The derived key is only ever used to
//! wrap the data key — it never touches credential bytes directly.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::TryRngCore;
use zeroize::Zeroize;

use crate::crypto::keys::WrappingKey;
use crate::errors::{CredVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived wrapping key in bytes (256 bits, for AES-256).
const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` so callers can pass
/// whatever was configured in `credvault.toml`.  The parameters used at
/// vault creation are stored in the vault header, so `Vault::open`
/// always re-derives with the exact same cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Derive a 256-bit wrapping key from a passphrase and salt using Argon2id.
///
/// Uses the default parameters (64 MB, 3 iterations, 4 lanes).  Prefer
/// `derive_wrapping_key_with_params` when the vault carries stored params.
pub fn derive_wrapping_key(passphrase: &[u8], salt: &[u8]) -> Result<WrappingKey> {
    derive_wrapping_key_with_params(passphrase, salt, &Argon2Params::default())
}

/// Derive a 256-bit wrapping key with explicit Argon2id parameters.
///
/// The same passphrase + salt + params always produce the same key —
/// this is how `Vault::open` regenerates the key that wrapped the data
/// key at save time.  Enforces minimum parameters to prevent dangerously
/// weak KDF settings.
pub fn derive_wrapping_key_with_params(
    passphrase: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<WrappingKey> {
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(CredVaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }
    if argon2_params.iterations < 1 {
        return Err(CredVaultError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if argon2_params.parallelism < 1 {
        return Err(CredVaultError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CredVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| {
            CredVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    let wrapping = WrappingKey::new(key);
    key.zeroize();
    Ok(wrapping)
}

/// Generate a cryptographically random 32-byte salt.
///
/// The salt is generated once per vault and never rotated; only the
/// data key and its nonce rotate over the vault's lifetime.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CredVaultError::RandomSource(format!("OS entropy unavailable: {e}")))?;
    Ok(salt)
}
