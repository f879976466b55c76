//! Passphrase stretching with PBKDF2-HMAC-SHA256.
//!
//! The passphrase is the base64 text of the link key, taken as UTF-8 bytes.
//! Every record carries its own salt, so every open or seal repeats the full
//! derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count shared by Encoder and Decoder.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Byte length of a record salt.
pub const SALT_LEN: usize = 16;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Errors produced by key derivation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    /// The passphrase was empty.
    #[error("passphrase must not be empty")]
    EmptyPassphrase,

    /// The salt is the wrong length (must be [`SALT_LEN`] bytes).
    #[error("invalid salt length: expected {SALT_LEN} bytes, got {0}")]
    InvalidSaltLength(usize),
}

/// Key material produced by [`derive`].
///
/// Not usable on its own: convert it with [`DerivedKey::into_sealing`] or
/// [`DerivedKey::into_opening`] so each key only ever works in one direction.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Consume this key as an encrypt-only key.
    pub fn into_sealing(self) -> SealingKey {
        SealingKey(self)
    }

    /// Consume this key as a decrypt-only key.
    pub fn into_opening(self) -> OpeningKey {
        OpeningKey(self)
    }

    pub(crate) fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Encrypt-only key. See [`crate::crypto::cipher::encrypt`].
#[derive(Debug, Clone)]
pub struct SealingKey(DerivedKey);

impl SealingKey {
    pub(crate) fn bytes(&self) -> &[u8; KEY_LEN] {
        self.0.bytes()
    }
}

/// Decrypt-only key. See [`crate::crypto::cipher::decrypt`].
#[derive(Debug, Clone)]
pub struct OpeningKey(DerivedKey);

impl OpeningKey {
    pub(crate) fn bytes(&self) -> &[u8; KEY_LEN] {
        self.0.bytes()
    }
}

/// Derive a 256-bit key from `passphrase` and a [`SALT_LEN`]-byte `salt`.
///
/// # Errors
///
/// Returns [`KeyDerivationError::EmptyPassphrase`] for an empty passphrase and
/// [`KeyDerivationError::InvalidSaltLength`] if `salt` is not [`SALT_LEN`] bytes.
pub fn derive(passphrase: &str, salt: &[u8]) -> Result<DerivedKey, KeyDerivationError> {
    if passphrase.is_empty() {
        return Err(KeyDerivationError::EmptyPassphrase);
    }
    if salt.len() != SALT_LEN {
        return Err(KeyDerivationError::InvalidSaltLength(salt.len()));
    }
    Ok(DerivedKey(stretch(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS)))
}

fn stretch(passphrase: &[u8], salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, rounds, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [7u8; SALT_LEN];

    #[test]
    fn stretch_matches_rfc7914_vector() {
        // PBKDF2-HMAC-SHA256, P = "passwd", S = "salt", c = 1, first 32 bytes.
        let expected: [u8; KEY_LEN] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];
        assert_eq!(stretch(b"passwd", b"salt", 1), expected);
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive("c2VjcmV0LWxpbmsta2V5IQ==", &SALT).unwrap();
        let b = derive("c2VjcmV0LWxpbmsta2V5IQ==", &SALT).unwrap();
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn different_salt_gives_different_key() {
        let a = derive("passphrase", &SALT).unwrap();
        let b = derive("passphrase", &[8u8; SALT_LEN]).unwrap();
        assert_ne!(a.bytes(), b.bytes());
    }

    #[test]
    fn empty_passphrase_rejected() {
        assert_eq!(
            derive("", &SALT).unwrap_err(),
            KeyDerivationError::EmptyPassphrase
        );
    }

    #[test]
    fn wrong_salt_length_rejected() {
        assert_eq!(
            derive("passphrase", &[0u8; 12]).unwrap_err(),
            KeyDerivationError::InvalidSaltLength(12)
        );
        assert_eq!(
            derive("passphrase", &[]).unwrap_err(),
            KeyDerivationError::InvalidSaltLength(0)
        );
    }

    #[test]
    fn derived_key_redacted_in_debug() {
        let key = derive("passphrase", &SALT).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
        assert!(format!("{:?}", key.into_opening()).contains("REDACTED"));
    }
}
