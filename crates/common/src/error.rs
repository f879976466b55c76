//! Common error types shared across crates.
//!
//! Cipher-level failures live next to the cipher in [`crate::crypto`]; the
//! types here cover the edges of the protocol:
//! - [`TransportError`]: the record store could not be fetched or parsed.
//!   The Decoder degrades to the generic message.
//! - [`ValidationError`]: the sender supplied unusable input. Reported back
//!   to the sender before any cryptography runs.
//! - [`EncodeError`]: everything that can abort sealing one message.

use thiserror::Error;

use crate::crypto::{envelope::SealError, CipherError, KeyDerivationError};

/// The record store could not be obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading the store from disk failed.
    #[error("failed to read record store {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The remote store answered with a non-2xx status.
    #[error("record store responded with status {0}")]
    Status(u16),

    /// The request to a remote store failed before a response arrived.
    #[error("record store request failed: {0}")]
    Request(String),

    /// The store body is not a JSON object of records.
    #[error("record store is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Authoring-time misuse, reported directly to the sender.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{0} is required and must not be empty")]
    MissingField(&'static str),

    /// The base URL could not be parsed as an absolute URL.
    #[error("base URL is not an absolute URL: {0}")]
    InvalidBaseUrl(String),

    /// A share link could not be parsed as a URL. The link itself is not
    /// echoed because it carries the key.
    #[error("link is not a valid URL")]
    InvalidLink,

    /// Batch input was valid JSON but not an object.
    #[error("batch input must be a JSON object mapping ids to messages")]
    NotAnObject,

    /// A batch entry has no usable message.
    #[error("entry {id:?} has no valid message")]
    MissingMessage {
        /// Recipient identifier of the skipped entry.
        id: String,
    },
}

/// Failure to seal a single message.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Input was rejected before any cryptography ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sealing key could not be derived.
    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    /// Encryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The plaintext payload could not be serialised.
    #[error("failed to serialise payload: {0}")]
    Serialise(#[from] serde_json::Error),
}

impl From<SealError> for EncodeError {
    fn from(e: SealError) -> Self {
        match e {
            SealError::KeyDerivation(e) => Self::KeyDerivation(e),
            SealError::Cipher(e) => Self::Cipher(e),
        }
    }
}
