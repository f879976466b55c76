//! Cipher module, protocol types, and the Encoder/Decoder pipelines shared by
//! the `cardseal` binaries.
//!
//! Both roles link this crate, so they agree on every encoding convention by
//! construction.

pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod link;
pub mod protocol;
pub mod source;

pub use decoder::{resolve, FallbackReason, Resolution};
pub use encoder::{encode_batch, encode_message, BatchOutput, SealedMessage};
pub use error::{EncodeError, TransportError, ValidationError};
pub use link::{LinkKey, LinkParams};
pub use protocol::{EncryptedRecord, PlaintextPayload, RecordStore, StoreEntry};
pub use source::{FileRecordSource, RecordSource};
