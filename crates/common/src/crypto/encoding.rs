//! Base64 transport encoding for link keys and record fields.
//!
//! Standard alphabet (not URL-safe). Output is always padded; input is
//! accepted with or without padding and with surrounding whitespace trimmed.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    DecodeError, Engine as _,
};

/// The engine used by both roles for every base64 value.
pub const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode `bytes` as padded standard base64.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    TRANSPORT.encode(bytes)
}

/// Decode standard base64, padded or not.
///
/// # Errors
///
/// Returns the underlying [`DecodeError`] for characters outside the standard
/// alphabet or an impossible length.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    TRANSPORT.decode(text.trim())
}
