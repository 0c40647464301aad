//! Password hashing with salted PBKDF2-HMAC-SHA256.
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`. The
//! iteration count travels with the hash so it can be raised later without
//! invalidating existing rows.

use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tokio::task::JoinError;

use super::session::bytes_to_hex;

const SCHEME: &str = "pbkdf2-sha256";
pub const DEFAULT_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Hash a plaintext password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hash_password_with(password, DEFAULT_ITERATIONS)
}

pub(crate) fn hash_password_with(password: &str, iterations: u32) -> String {
    let salt: [u8; SALT_LEN] = rand::rng().random();
    let key = derive(password, &salt, iterations);
    format!("{SCHEME}${iterations}${}${}", bytes_to_hex(&salt), bytes_to_hex(&key))
}

/// Check a plaintext password against a stored hash string.
///
/// Malformed stored hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((iterations, salt, expected)) = parse_stored(stored) else {
        return false;
    };
    let actual = derive(password, &salt, iterations);
    actual.as_slice().ct_eq(&expected).into()
}

/// [`hash_password`] on the blocking pool, keeping async workers free.
///
/// # Errors
///
/// Returns the join error if the hashing task panicked.
pub async fn hash_in_background(password: String) -> Result<String, JoinError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await
}

/// [`verify_password`] on the blocking pool.
///
/// # Errors
///
/// Returns the join error if the verification task panicked.
pub async fn verify_in_background(password: String, stored: String) -> Result<bool, JoinError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn parse_stored(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations = parts.next()?.parse::<u32>().ok().filter(|n| *n > 0)?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || salt.is_empty() || hash.len() != KEY_LEN {
        return None;
    }
    Some((iterations, salt, hash))
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
