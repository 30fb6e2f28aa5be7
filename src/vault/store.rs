//! The `Vault`: the top-level passphrase-protected credential store.
//!
//! The credential map lives in memory only as ciphertext.  Every
//! operation decrypts it into a scoped buffer, does its work, and for
//! mutations re-seals the map under a brand-new random key and nonce
//! before swapping the {secret, nonce, ciphertext} triple in.  No
//! plaintext survives the operation, and a failed operation changes
//! nothing.

use std::path::Path;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::crypto::kdf::{
    derive_wrapping_key_with_params, generate_salt, Argon2Params, SALT_LEN,
};
use crate::crypto::passgen;
use crate::errors::{CredVaultError, Result};

use super::codec;
use super::credential::{Credential, CredentialStore};
use super::envelope::{self, Sealed};
use super::format::{self, VaultHeader, CURRENT_VERSION};

/// A passphrase-protected credential store.
///
/// Not safe for concurrent mutation from multiple threads — callers
/// needing shared access must serialize operations externally.
pub struct Vault {
    /// Retained so `save` can re-derive the wrapping key; wiped on drop.
    passphrase: Zeroizing<Vec<u8>>,

    /// Random KDF salt, fixed for the vault's lifetime.
    salt: [u8; SALT_LEN],

    /// Argon2 parameters in effect for this vault.
    params: Argon2Params,

    /// When the vault was created; persisted in the header.
    created_at: DateTime<Utc>,

    /// The current data key, nonce, and credential-map ciphertext.
    sealed: Sealed,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new, empty vault protected by `passphrase`.
    ///
    /// Generates a fresh salt, data key, and nonce.  Nothing touches
    /// disk until `save`; the KDF only runs at save and open time.
    pub fn new(passphrase: &str) -> Result<Self> {
        Self::new_with_params(passphrase, Argon2Params::default())
    }

    /// Create a new vault with explicit Argon2 parameters
    /// (e.g. from `Settings::argon2_params`).
    pub fn new_with_params(passphrase: &str, params: Argon2Params) -> Result<Self> {
        let salt = generate_salt()?;
        let payload = codec::encode(&CredentialStore::new())?;
        let sealed = Sealed::seal(&payload)?;

        Ok(Self {
            passphrase: Zeroizing::new(passphrase.as_bytes().to_vec()),
            salt,
            params,
            created_at: Utc::now(),
            sealed,
        })
    }

    /// Open a vault file.
    ///
    /// Reads the envelope, re-derives the wrapping key from the
    /// passphrase and the stored salt and Argon2 params, and unwraps
    /// the data key.  The credential ciphertext is held exactly as it
    /// was on disk — no re-encryption happens here.
    ///
    /// A missing file is `VaultNotFound`, so callers can tell "no vault
    /// yet" apart from a wrong passphrase (`DecryptionFailed`).
    pub fn open(path: &Path, passphrase: &str) -> Result<Self> {
        let raw = format::read_vault(path)?;

        let salt: [u8; SALT_LEN] = raw.header.salt.as_slice().try_into().map_err(|_| {
            CredVaultError::InvalidVaultFormat(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                raw.header.salt.len()
            ))
        })?;
        let params: Argon2Params = raw.header.argon2_params.into();

        let wrapping = derive_wrapping_key_with_params(passphrase.as_bytes(), &salt, &params)?;
        let secret = envelope::unwrap_secret(&wrapping, &raw.wrap_nonce, &raw.wrapped_secret)?;

        Ok(Self {
            passphrase: Zeroizing::new(passphrase.as_bytes().to_vec()),
            salt,
            params,
            created_at: raw.header.created_at,
            sealed: Sealed::from_parts(secret, raw.data_nonce, raw.ciphertext),
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Store a credential under a new location.
    pub fn add(&mut self, location: &str, credential: Credential) -> Result<()> {
        self.update_store(|store| {
            if store.contains_key(location) {
                return Err(CredVaultError::CredentialExists(location.to_string()));
            }
            store.insert(location.to_string(), credential);
            Ok(())
        })
    }

    /// Look up the credential for `location` and return a copy.
    pub fn get(&self, location: &str) -> Result<Credential> {
        self.with_store(|store| {
            store
                .get(location)
                .cloned()
                .ok_or_else(|| CredVaultError::CredentialNotFound(location.to_string()))
        })
    }

    /// Replace the credential at an existing location wholesale.
    pub fn edit(&mut self, location: &str, credential: Credential) -> Result<()> {
        self.update_store(|store| {
            if !store.contains_key(location) {
                return Err(CredVaultError::CredentialNotFound(location.to_string()));
            }
            store.insert(location.to_string(), credential);
            Ok(())
        })
    }

    /// Store a credential with a freshly generated random password
    /// under a new location.
    pub fn generate(&mut self, location: &str, username: &str) -> Result<()> {
        self.generate_with_length(location, username, passgen::DEFAULT_PASSWORD_LEN)
    }

    /// Like `generate`, with an explicit password length
    /// (e.g. from `Settings::password_length`).
    pub fn generate_with_length(
        &mut self,
        location: &str,
        username: &str,
        length: usize,
    ) -> Result<()> {
        self.update_store(|store| {
            if store.contains_key(location) {
                return Err(CredVaultError::CredentialExists(location.to_string()));
            }
            let password = passgen::generate_password(length);
            store.insert(location.to_string(), Credential::new(username, password));
            Ok(())
        })
    }

    /// List every stored location, in unspecified order.
    pub fn locations(&self) -> Result<Vec<String>> {
        self.with_store(|store| Ok(store.keys().cloned().collect()))
    }

    /// Number of credentials currently stored.
    pub fn credential_count(&self) -> Result<usize> {
        self.with_store(|store| Ok(store.len()))
    }

    /// When the vault was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the vault to `path` atomically, rotating the data key.
    ///
    /// The credential map is re-sealed under a fresh key and nonce even
    /// if nothing changed, so every on-disk write uses a
    /// never-before-used pair.  The wrapping key is re-derived from the
    /// passphrase each save rather than cached.  The new triple is
    /// swapped in only after the file is safely on disk.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let payload = self.sealed.open_payload()?;
        let resealed = Sealed::seal(&payload)?;
        drop(payload);

        let wrapping =
            derive_wrapping_key_with_params(&self.passphrase, &self.salt, &self.params)?;
        let (wrap_nonce, wrapped_secret) = resealed.wrap(&wrapping)?;

        let header = VaultHeader {
            version: CURRENT_VERSION,
            salt: self.salt.to_vec(),
            created_at: self.created_at,
            argon2_params: self.params.into(),
        };

        format::write_vault(
            path,
            &header,
            &wrap_nonce,
            &wrapped_secret,
            resealed.nonce(),
            resealed.ciphertext(),
        )?;

        self.sealed = resealed;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transient-plaintext helpers
    // ------------------------------------------------------------------

    /// Decrypt the map, run a read-only closure, discard the plaintext.
    fn with_store<T>(&self, f: impl FnOnce(&CredentialStore) -> Result<T>) -> Result<T> {
        let payload = self.sealed.open_payload()?;
        let store = codec::decode(&payload)?;
        f(&store)
        // `payload` zeroes itself here; `store` wipes each credential
        // as the map drops.
    }

    /// Decrypt the map, run a mutating closure, re-seal under a fresh
    /// key and nonce.
    ///
    /// If the closure fails, nothing is re-sealed: the existing
    /// {secret, nonce, ciphertext} stay untouched, so an error can
    /// never leave the vault partially mutated.
    fn update_store<T>(&mut self, f: impl FnOnce(&mut CredentialStore) -> Result<T>) -> Result<T> {
        let payload = self.sealed.open_payload()?;
        let mut store = codec::decode(&payload)?;
        drop(payload);

        let out = f(&mut store)?;

        let payload = codec::encode(&store)?;
        self.sealed = Sealed::seal(&payload)?;
        Ok(out)
    }
}
