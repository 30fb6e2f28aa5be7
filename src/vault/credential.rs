//! Credential value object and the in-memory credential map.
//!
//! A `Credential` is immutable once constructed — `Vault::edit`
//! replaces it wholesale, never field by field.  Both fields are wiped
//! from memory when the value is dropped, so a decrypted map cleans up
//! after itself on every exit path.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A username/password pair stored under a location name.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Manual Debug so a credential can never leak its password into logs
// or panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The decrypted credential map: location name -> credential.
///
/// Exists only transiently inside a vault operation; locations are
/// unique by construction of the map.  Iteration order is unspecified —
/// callers sort if they need an order.
pub type CredentialStore = HashMap<String, Credential>;
