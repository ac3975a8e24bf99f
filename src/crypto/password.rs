//! Credential hashing for user accounts.
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
//! Anything without the prefix is a legacy plaintext password; it still
//! verifies (in constant time) until an admin saves the account again.

use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::CryptoError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;
pub const HASH_PREFIX: &str = "pbkdf2-sha256";

/// Result of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    /// Matched a plaintext value that predates hashing.
    LegacyMatch,
    Mismatch,
}

/// Hash with an explicit iteration count. Stored alongside the hash, so
/// verification needs no configuration.
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    let salt = generate_salt();
    let hash = derive(password, &salt, iterations);
    let engine = base64::engine::general_purpose::STANDARD_NO_PAD;
    Ok(format!(
        "{HASH_PREFIX}${iterations}${}${}",
        engine.encode(salt),
        engine.encode(hash.as_slice())
    ))
}

/// Check `password` against a stored hash or legacy plaintext value.
pub fn verify_password(password: &str, stored: &str) -> Result<PasswordCheck, CryptoError> {
    if !is_hashed(stored) {
        let matched = password.as_bytes().ct_eq(stored.as_bytes()).unwrap_u8() == 1;
        return Ok(if matched {
            PasswordCheck::LegacyMatch
        } else {
            PasswordCheck::Mismatch
        });
    }

    let mut parts = stored.split('$');
    let (Some(_), Some(iterations), Some(salt), Some(expected), None) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CryptoError::MalformedHash);
    };

    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    if iterations == 0 {
        return Err(CryptoError::MalformedHash);
    }
    let engine = base64::engine::general_purpose::STANDARD_NO_PAD;
    let salt = engine.decode(salt).map_err(|_| CryptoError::MalformedHash)?;
    let expected = engine.decode(expected).map_err(|_| CryptoError::MalformedHash)?;

    let actual = derive(password, &salt, iterations);
    if actual.as_slice().ct_eq(expected.as_slice()).unwrap_u8() == 1 {
        Ok(PasswordCheck::Match)
    } else {
        Ok(PasswordCheck::Mismatch)
    }
}

/// Whether a stored value is a PBKDF2 hash rather than legacy plaintext.
pub fn is_hashed(stored: &str) -> bool {
    stored
        .strip_prefix(HASH_PREFIX)
        .is_some_and(|rest| rest.starts_with('$'))
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut out = Zeroizing::new([0u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out[..]);
    out
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
