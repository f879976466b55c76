//! Record framing: salt + derivation + AEAD + base64, in both directions.

use super::{
    cipher::{self, CipherError, DecryptionFailure, NONCE_LEN},
    encoding,
    kdf::{self, KeyDerivationError, SALT_LEN},
    random_bytes,
};
use crate::protocol::EncryptedRecord;

/// Errors from [`seal`].
#[derive(Debug, thiserror::Error)]
pub enum SealError {
    /// The sealing key could not be derived.
    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    /// Encryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Encrypt `plaintext` for `passphrase` under a fresh salt and nonce.
///
/// # Errors
///
/// Returns [`SealError::KeyDerivation`] for an empty passphrase and
/// [`SealError::Cipher`] if the AEAD fails.
pub fn seal(plaintext: &[u8], passphrase: &str) -> Result<EncryptedRecord, SealError> {
    let salt = random_bytes::<SALT_LEN>();
    let key = kdf::derive(passphrase, &salt)?.into_sealing();
    let sealed = cipher::encrypt(plaintext, &key)?;

    Ok(EncryptedRecord {
        iv: encoding::encode(sealed.iv),
        salt: encoding::encode(salt),
        ciphertext: encoding::encode(&sealed.ciphertext),
    })
}

/// Decode, derive, and decrypt `record` with `passphrase`, returning the
/// plaintext as text.
///
/// # Errors
///
/// Every failure (bad base64, wrong field lengths, derivation, tag
/// verification, non-UTF-8 plaintext) is a [`DecryptionFailure`].
pub fn open(record: &EncryptedRecord, passphrase: &str) -> Result<String, DecryptionFailure> {
    let iv = decode_field("iv", &record.iv, Some(NONCE_LEN))?;
    let salt = decode_field("salt", &record.salt, Some(SALT_LEN))?;
    let ciphertext = decode_field("ciphertext", &record.ciphertext, None)?;

    let key = kdf::derive(passphrase, &salt)?.into_opening();
    let plaintext = cipher::decrypt(&ciphertext, &key, &iv)?;
    String::from_utf8(plaintext).map_err(|_| DecryptionFailure::InvalidUtf8)
}

fn decode_field(
    field: &'static str,
    value: &str,
    expected: Option<usize>,
) -> Result<Vec<u8>, DecryptionFailure> {
    let bytes = encoding::decode(value).map_err(|_| DecryptionFailure::Encoding { field })?;
    match expected {
        Some(len) if bytes.len() != len => Err(DecryptionFailure::InvalidLength {
            field,
            expected: len,
            actual: bytes.len(),
        }),
        _ => Ok(bytes),
    }
}
