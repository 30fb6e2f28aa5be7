//! CredVault — a local, passphrase-protected credential store.
//!
//! A `Vault` maps human-chosen location names to username/password
//! pairs.  The map is held in memory only as AES-256-GCM ciphertext
//! under a random data key; the data key is wrapped under an Argon2id
//! passphrase-derived key for persistence and rotates on every save.
//!
//! ```no_run
//! use credvault::vault::{Credential, Vault};
//!
//! # fn main() -> credvault::errors::Result<()> {
//! let mut vault = Vault::new("correct horse battery staple")?;
//! vault.add("example.com", Credential::new("alice", "hunter2"))?;
//! vault.save(std::path::Path::new("creds.vault"))?;
//!
//! let vault = Vault::open(std::path::Path::new("creds.vault"), "correct horse battery staple")?;
//! let cred = vault.get("example.com")?;
//! assert_eq!(cred.username, "alice");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{CredVaultError, Result};
pub use vault::{Credential, Vault};
