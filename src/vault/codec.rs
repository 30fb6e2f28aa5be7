//! Serialization of the credential map to a flat byte payload.
//!
//! The payload is what the envelope layer encrypts; it must round-trip
//! exactly for every store, including the empty one.  A decode failure
//! is reported as `DecryptionFailed`: the AEAD tag already authenticates
//! the payload, so in practice a malformed payload only appears when
//! something decrypted with the wrong key.

use zeroize::Zeroizing;

use super::credential::CredentialStore;
use crate::errors::{CredVaultError, Result};

/// Serialize the credential map into a plaintext payload.
///
/// The returned buffer holds every password in the store, so it is
/// wrapped in `Zeroizing` and wiped as soon as the caller drops it.
pub fn encode(store: &CredentialStore) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(store)
        .map(Zeroizing::new)
        .map_err(|e| CredVaultError::SerializationError(format!("credential map: {e}")))
}

/// Deserialize a plaintext payload back into a credential map.
pub fn decode(payload: &[u8]) -> Result<CredentialStore> {
    serde_json::from_slice(payload).map_err(|_| CredVaultError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::credential::Credential;

    #[test]
    fn empty_store_round_trips() {
        let store = CredentialStore::new();
        let bytes = encode(&store).unwrap();
        assert_eq!(decode(&bytes).unwrap(), store);
    }

    #[test]
    fn store_with_control_characters_round_trips() {
        let mut store = CredentialStore::new();
        store.insert(
            "weird \u{0} location\n".to_string(),
            Credential::new("user\twith\ttabs", "p\u{1}ss\u{7f}wörd\u{202e}"),
        );
        store.insert("plain".to_string(), Credential::new("alice", "hunter2"));

        let bytes = encode(&store).unwrap();
        assert_eq!(decode(&bytes).unwrap(), store);
    }

    #[test]
    fn garbage_payload_is_a_decrypt_failure() {
        let result = decode(b"\xffnot json");
        assert!(matches!(result, Err(CredVaultError::DecryptionFailed)));
    }
}
