//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption under an explicit nonce (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - Zeroize-on-drop wrapping/data key types (`keys`)
//! - Random password generation (`passgen`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod passgen;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_wrapping_key, ...};
pub use encryption::{open, seal, NONCE_LEN};
pub use kdf::{derive_wrapping_key, derive_wrapping_key_with_params, generate_salt, Argon2Params};
pub use keys::{DataKey, WrappingKey};
pub use passgen::{generate_password, DEFAULT_PASSWORD_LEN};
