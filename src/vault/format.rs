//! Binary vault file format.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [CVLT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON]
//! [wrap nonce: 12 bytes][wrapped secret: 48 bytes][data nonce: 12 bytes][ciphertext]
//! ```
//!
//! - **Magic** (`CVLT`): identifies the file as a CredVault vault.
//! - **Version**: format version (currently `1`).
//! - **Header JSON**: serialized `VaultHeader` — the salt and KDF
//!   parameters needed to re-derive the wrapping key, plus metadata.
//! - **Wrap nonce / wrapped secret**: the data key encrypted under the
//!   passphrase-derived wrapping key.
//! - **Data nonce / ciphertext**: the encrypted credential map.
//!
//! The file is self-contained: everything needed to attempt a decrypt,
//! given the passphrase, is in it.  The crypto fields after the header
//! are raw fixed-length binary, so a single flipped bit there lands in
//! an AEAD payload and fails authentication rather than parsing.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::WRAPPED_SECRET_LEN;
use crate::crypto::encryption::{NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::Argon2Params;
use crate::errors::{CredVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"CVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

/// Fixed-length crypto fields after the header: wrap nonce + wrapped
/// secret + data nonce.
const CRYPTO_FIELDS_LEN: usize = NONCE_LEN + WRAPPED_SECRET_LEN + NONCE_LEN;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Argon2 parameters stored in the vault header so the exact same KDF
/// settings are used when re-opening.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoredArgon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for StoredArgon2Params {
    fn default() -> Self {
        let p = Argon2Params::default();
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

impl From<Argon2Params> for StoredArgon2Params {
    fn from(p: Argon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

impl From<StoredArgon2Params> for Argon2Params {
    fn from(p: StoredArgon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

/// Metadata stored at the beginning of a vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id key derivation (base64 in JSON).
    /// Generated once at vault creation and never rotated.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// Argon2 params used at vault creation (stored so open uses the same).
    pub argon2_params: StoredArgon2Params,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**.
///
/// Serializes the header, assembles the full envelope, writes it to a
/// temp file in the same directory, then renames over the target path.
/// The rename ensures readers never see a half-written file and an
/// interrupted save leaves the old file intact.
pub fn write_vault(
    path: &Path,
    header: &VaultHeader,
    wrap_nonce: &[u8; NONCE_LEN],
    wrapped_secret: &[u8],
    data_nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<()> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| CredVaultError::SerializationError(format!("header: {e}")))?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        CredVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let total = PREFIX_LEN + header_bytes.len() + CRYPTO_FIELDS_LEN + ciphertext.len();
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(wrap_nonce); // 12 bytes
    buf.extend_from_slice(wrapped_secret); // 48 bytes
    buf.extend_from_slice(data_nonce); // 12 bytes
    buf.extend_from_slice(ciphertext);

    // Atomic write: temp file in the same directory, then rename.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// The parts of a vault file read back from disk.
pub struct RawVault {
    pub header: VaultHeader,
    pub wrap_nonce: [u8; NONCE_LEN],
    pub wrapped_secret: Vec<u8>,
    pub data_nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Read a vault file from disk and split it into its parts.
///
/// Structural problems (bad magic, impossible lengths) surface as
/// `InvalidVaultFormat`; a missing file surfaces as `VaultNotFound`.
/// Whether the crypto fields actually decrypt is the caller's business.
pub fn read_vault(path: &Path) -> Result<RawVault> {
    if !path.exists() {
        return Err(CredVaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    // Minimum size: prefix + crypto fields + a ciphertext auth tag.
    let min_size = PREFIX_LEN + CRYPTO_FIELDS_LEN + TAG_LEN;
    if data.len() < min_size {
        return Err(CredVaultError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    // --- Parse the fixed-size prefix ---

    if &data[0..4] != MAGIC {
        return Err(CredVaultError::InvalidVaultFormat(
            "missing CVLT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(CredVaultError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| CredVaultError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        CredVaultError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN + header_len;
    if header_end + CRYPTO_FIELDS_LEN + TAG_LEN > data.len() {
        return Err(CredVaultError::InvalidVaultFormat(
            "header length exceeds file size".into(),
        ));
    }

    // --- Split the variable and fixed-length sections ---

    let header: VaultHeader = serde_json::from_slice(&data[PREFIX_LEN..header_end])
        .map_err(|e| CredVaultError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    let mut offset = header_end;
    let mut wrap_nonce = [0u8; NONCE_LEN];
    wrap_nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
    offset += NONCE_LEN;

    let wrapped_secret = data[offset..offset + WRAPPED_SECRET_LEN].to_vec();
    offset += WRAPPED_SECRET_LEN;

    let mut data_nonce = [0u8; NONCE_LEN];
    data_nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
    offset += NONCE_LEN;

    let ciphertext = data[offset..].to_vec();

    Ok(RawVault {
        header,
        wrap_nonce,
        wrapped_secret,
        data_nonce,
        ciphertext,
    })
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
