//! AES-256-GCM encryption and decryption of record payloads.
//!
//! Each call to [`encrypt`] draws a fresh 96-bit nonce from the OS CSPRNG.
//! Keys are single-use in practice (one salt per record), but the nonce is
//! still never reused or caller-supplied. No associated data is bound.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    AeadCore, Aes256Gcm, Nonce,
};
use thiserror::Error;

use super::kdf::{KeyDerivationError, OpeningKey, SealingKey};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Output of a single [`encrypt`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Raw nonce bytes.
    pub iv: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

/// Errors produced while sealing.
#[derive(Debug, Error)]
pub enum CipherError {
    /// AES-GCM encryption failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Reasons a record could not be opened.
///
/// The Decoder never shows these to a viewer; they are logged and the
/// viewer falls back to a greeting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptionFailure {
    /// A record field is not valid base64.
    #[error("{field} is not valid base64")]
    Encoding {
        /// Name of the offending record field.
        field: &'static str,
    },

    /// A decoded record field has the wrong byte length.
    #[error("{field} has invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the offending record field.
        field: &'static str,
        /// Required byte length.
        expected: usize,
        /// Byte length found.
        actual: usize,
    },

    /// The ciphertext is shorter than the authentication tag.
    #[error("ciphertext is truncated")]
    Truncated,

    /// Tag verification failed: wrong key, wrong nonce, or tampered data.
    #[error("authentication failed")]
    Authentication,

    /// The authenticated plaintext is not UTF-8 text.
    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8,

    /// The opening key could not be derived.
    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (unreachable
/// with a valid key and nonce).
pub fn encrypt(plaintext: &[u8], key: &SealingKey) -> Result<Sealed, CipherError> {
    let cipher = Aes256Gcm::new_from_slice(key.bytes()).map_err(|_| CipherError::AeadFailure)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut iv = [0u8; NONCE_LEN];
    iv.copy_from_slice(nonce.as_slice());
    Ok(Sealed { iv, ciphertext })
}

/// Decrypt and authenticate `ciphertext` (tag appended) with `key` and `iv`.
///
/// # Errors
///
/// Returns [`DecryptionFailure::InvalidLength`] if `iv` is not [`NONCE_LEN`]
/// bytes, [`DecryptionFailure::Truncated`] if there is no room for a tag, and
/// [`DecryptionFailure::Authentication`] if the tag does not verify.
pub fn decrypt(ciphertext: &[u8], key: &OpeningKey, iv: &[u8]) -> Result<Vec<u8>, DecryptionFailure> {
    if iv.len() != NONCE_LEN {
        return Err(DecryptionFailure::InvalidLength {
            field: "iv",
            expected: NONCE_LEN,
            actual: iv.len(),
        });
    }
    if ciphertext.len() < TAG_LEN {
        return Err(DecryptionFailure::Truncated);
    }
    let cipher =
        Aes256Gcm::new_from_slice(key.bytes()).map_err(|_| DecryptionFailure::Authentication)?;
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| DecryptionFailure::Authentication)
}
