//! Encoder role: seal messages into records and share links.
//!
//! Input is validated before any key material is generated. A batch is
//! processed one entry at a time in input order; a bad entry is logged and
//! skipped, never fatal to the rest.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::crypto::envelope;
use crate::error::{EncodeError, ValidationError};
use crate::link::{self, LinkKey};
use crate::protocol::{EncryptedRecord, PlaintextPayload, RecordStore};

/// One sealed message and the link that opens it.
#[derive(Debug, Clone)]
pub struct SealedMessage {
    /// Recipient identifier, as used in the store and the link.
    pub recipient_id: String,
    /// Record to place in the store under `recipient_id`.
    pub record: EncryptedRecord,
    /// Share link carrying the recipient id and key.
    pub link: String,
    /// The key embedded in `link`.
    pub link_key: LinkKey,
}

impl SealedMessage {
    /// `"<id>": { … }` fragment for adding this record to a store by hand.
    pub fn snippet(&self) -> String {
        self.record.snippet(&self.recipient_id)
    }
}

/// Seal `message` for `recipient_id`.
///
/// The recipient id is trimmed; a blank `display_name` falls back to it.
///
/// # Errors
///
/// Returns [`EncodeError::Validation`] for a blank recipient id, empty
/// message, or unusable base URL (checked before any cryptography), and
/// [`EncodeError::KeyDerivation`] / [`EncodeError::Cipher`] if sealing fails.
pub fn encode_message(
    recipient_id: &str,
    display_name: Option<&str>,
    message: &str,
    base_url: &str,
) -> Result<SealedMessage, EncodeError> {
    let base = link::parse_base_url(base_url)?;
    let recipient_id = recipient_id.trim();
    if recipient_id.is_empty() {
        return Err(ValidationError::MissingField("recipient id").into());
    }
    if message.is_empty() {
        return Err(ValidationError::MissingField("message").into());
    }
    let display_name = resolve_display_name(display_name, recipient_id);
    seal_for(&base, recipient_id, display_name, message)
}

fn resolve_display_name<'a>(display_name: Option<&'a str>, recipient_id: &'a str) -> &'a str {
    display_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(recipient_id)
}

fn seal_for(
    base: &Url,
    recipient_id: &str,
    display_name: &str,
    message: &str,
) -> Result<SealedMessage, EncodeError> {
    let link_key = LinkKey::generate();
    let plaintext = Zeroizing::new(PlaintextPayload::new(display_name, message).to_json()?);
    let record = envelope::seal(plaintext.as_bytes(), link_key.as_str())?;
    let link = link::build_link(base, recipient_id, &link_key);
    debug!(recipient_id, "message sealed");

    Ok(SealedMessage {
        recipient_id: recipient_id.to_owned(),
        record,
        link,
        link_key,
    })
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// A batch entry that produced no record.
#[derive(Debug)]
pub struct SkippedEntry {
    /// Recipient identifier of the entry.
    pub recipient_id: String,
    /// Why it was skipped.
    pub reason: EncodeError,
}

/// Result of [`encode_batch`].
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Records for every sealed entry.
    pub store: RecordStore,
    /// `(recipient id, link)` in input order.
    pub links: Vec<(String, String)>,
    /// Entries that were skipped, in input order.
    pub skipped: Vec<SkippedEntry>,
}

impl BatchOutput {
    /// `id: link` lines joined by newlines.
    pub fn links_text(&self) -> String {
        self.links
            .iter()
            .map(|(id, link)| format!("{id}: {link}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Seal every entry of a batch input object.
///
/// Each value is either a message string (display name = id) or an object
/// `{"displayName"?: string, "message": string}`.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnObject`] if `input` is not a JSON object
/// and the base URL errors of [`link::parse_base_url`]. Problems with single
/// entries are reported in [`BatchOutput::skipped`] instead.
pub fn encode_batch(input: &Value, base_url: &str) -> Result<BatchOutput, ValidationError> {
    let entries = input.as_object().ok_or(ValidationError::NotAnObject)?;
    let base = link::parse_base_url(base_url)?;

    let mut out = BatchOutput::default();
    for (id, raw) in entries {
        let sealed = batch_entry(id, raw)
            .map_err(EncodeError::from)
            .and_then(|(display_name, message)| seal_for(&base, id, display_name, message));

        match sealed {
            Ok(sealed) => {
                out.links.push((sealed.recipient_id.clone(), sealed.link));
                out.store.insert(sealed.recipient_id, sealed.record);
            }
            Err(reason) => {
                warn!(recipient_id = %id, error = %reason, "skipping batch entry");
                out.skipped.push(SkippedEntry {
                    recipient_id: id.clone(),
                    reason,
                });
            }
        }
    }
    Ok(out)
}

/// Pull `(display name, message)` out of one batch value.
fn batch_entry<'a>(id: &'a str, raw: &'a Value) -> Result<(&'a str, &'a str), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::MissingField("recipient id"));
    }
    let (display_name, message) = match raw {
        Value::String(message) => (None, Some(message.as_str())),
        Value::Object(map) => (
            map.get("displayName").and_then(Value::as_str),
            map.get("message").and_then(Value::as_str),
        ),
        _ => (None, None),
    };
    match message {
        Some(message) if !message.is_empty() => {
            Ok((resolve_display_name(display_name, id), message))
        }
        _ => Err(ValidationError::MissingMessage { id: id.to_owned() }),
    }
}
