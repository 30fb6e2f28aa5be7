//! Random password generation for `Vault::generate`.

use rand::Rng;

/// Characters a generated password may contain: ASCII letters, digits,
/// and symbols.
const CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}<>?";

/// Default length of a generated password.
pub const DEFAULT_PASSWORD_LEN: usize = 32;

/// Generate a random password of `len` characters from `CHARSET`.
///
/// Uses the thread-local CSPRNG; `random_range` samples uniformly, so
/// no character is favored by modulo bias.
pub fn generate_password(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
