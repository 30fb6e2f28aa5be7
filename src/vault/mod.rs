//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `Credential` and the transient `CredentialStore` map (`credential`)
//! - Credential-map byte codec (`codec`)
//! - Data-key envelope with rotation and wrap/unwrap (`envelope`)
//! - Binary vault file format with atomic writes (`format`)
//! - The top-level `Vault` and its operations (`store`)

pub mod codec;
pub mod credential;
mod envelope;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use credential::{Credential, CredentialStore};
pub use format::{StoredArgon2Params, VaultHeader};
pub use store::Vault;
