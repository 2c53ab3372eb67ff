//! Client secret generation, hashing, and verification.
//!
//! Secrets are only ever visible in plaintext at generation time; the store
//! persists the Argon2id hash and a short display prefix.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::errors::ClientError;

/// Characters a client secret is drawn from.
const SECRET_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890_-.~";

/// Length of a generated client secret.
pub const SECRET_LENGTH: usize = 40;

/// Length of the non-secret prefix retained for display.
pub const SECRET_PREFIX_LENGTH: usize = 3;

/// Generate a new high-entropy client secret.
///
/// Fails only when the operating system entropy source does.
pub fn generate_secret() -> Result<String, ClientError> {
    // Largest multiple of the alphabet size below 256; bytes at or above it
    // are rejected to keep the draw uniform.
    let zone = (256 / SECRET_CHARS.len()) * SECRET_CHARS.len();

    let mut secret = String::with_capacity(SECRET_LENGTH);
    let mut buf = [0u8; 64];
    while secret.len() < SECRET_LENGTH {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|err| ClientError::Internal(format!("entropy source failed: {err}")))?;
        for byte in buf {
            if secret.len() == SECRET_LENGTH {
                break;
            }
            if (byte as usize) < zone {
                secret.push(SECRET_CHARS[byte as usize % SECRET_CHARS.len()] as char);
            }
        }
    }

    Ok(secret)
}

/// Derive the stored Argon2id hash for a plaintext secret.
///
/// The output is a self-describing PHC string embedding algorithm,
/// parameters, and salt.
pub fn derive_hash(secret: &str) -> Result<String, ClientError> {
    use argon2::password_hash::{SaltString, rand_core::OsRng};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ClientError::Internal(format!("secret hashing failed: {err}")))
}

/// Verify a presented plaintext secret against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash encoding is an error.
pub fn verify_hash(secret: &str, hash: &str) -> Result<bool, ClientError> {
    use argon2::password_hash::PasswordHash;
    use argon2::{Argon2, PasswordVerifier};

    let parsed = PasswordHash::new(hash)
        .map_err(|err| ClientError::Internal(format!("malformed secret hash: {err}")))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(ClientError::Internal(format!(
            "secret verification failed: {err}"
        ))),
    }
}

/// Non-secret prefix of a plaintext secret, safe to disclose.
///
/// Must be taken from the same plaintext that produced the stored hash so
/// the two never go stale relative to each other.
pub fn secret_prefix(secret: &str) -> &str {
    &secret[..SECRET_PREFIX_LENGTH]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_secret_length() {
        let secret = generate_secret().unwrap();
        assert_eq!(secret.len(), SECRET_LENGTH);
    }

    #[test]
    fn test_generate_secret_alphabet() {
        let secret = generate_secret().unwrap();
        for ch in secret.bytes() {
            assert!(
                SECRET_CHARS.contains(&ch),
                "unexpected character: {}",
                ch as char
            );
        }
    }

    #[test]
    fn test_generate_secret_unique() {
        let s1 = generate_secret().unwrap();
        let s2 = generate_secret().unwrap();
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_generate_secret_no_duplicates_in_ten_thousand() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_secret().unwrap()));
        }
    }

    #[test]
    fn test_hash_round_trip() {
        let secret = generate_secret().unwrap();
        let hash = derive_hash(&secret).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_hash(&secret, &hash).unwrap());
        assert!(!verify_hash("some-other-secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_is_error() {
        assert!(verify_hash("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_secret_prefix() {
        assert_eq!(secret_prefix("abcdefg"), "abc");
    }
}
