//! Cipher module: PBKDF2 key derivation, AES-256-GCM sealing, and the
//! transport encoding both roles share.
//!
//! This module is free of I/O. Encoder and Decoder call into it with plain
//! bytes and strings and get plain values back.
//!
//! # Record format
//!
//! ```text
//! { "iv": base64(12 bytes), "salt": base64(16 bytes), "ciphertext": base64(ct || tag) }
//! ```
//!
//! The key for each record is `PBKDF2-HMAC-SHA256(link key text, salt, 100_000)`.

pub mod cipher;
pub mod encoding;
pub mod envelope;
pub mod kdf;

pub use cipher::{CipherError, DecryptionFailure, NONCE_LEN};
pub use kdf::{derive, DerivedKey, KeyDerivationError, OpeningKey, SealingKey, KEY_LEN, SALT_LEN};

use aes_gcm::aead::{rand_core::RngCore, OsRng};

/// Fill an `N`-byte array from the OS CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}
