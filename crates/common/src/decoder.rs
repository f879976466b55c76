//! Decoder role: turn link parameters into something to display.
//!
//! Stages run strictly in order and each one only runs once the previous
//! stage's precondition holds:
//!
//! 1. no recipient id          → generic
//! 2. id but no key            → greeting by id
//! 3. store fetch/parse fails  → generic
//! 4. no record for the id     → greeting by id
//! 5. entry malformed, record does not open, or opens empty → greeting by id
//! 6. record opens             → personalized (structured or legacy payload)
//!
//! Nothing here returns an error: every failure is logged and degrades to a
//! fallback.

use tracing::{debug, error, warn};

use crate::crypto::envelope;
use crate::link::{LinkKey, LinkParams};
use crate::protocol::{DisplayKind, DisplayResponse, PlaintextPayload, StoreEntry};
use crate::source::RecordSource;

/// Why the viewer did not get a personalized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The link has no recipient id.
    MissingRecipient,
    /// The link has an id but no key.
    MissingKey,
    /// The record store could not be fetched or parsed.
    StoreUnavailable,
    /// The store has no record for the id.
    UnknownRecipient,
    /// The record exists but could not be decoded or authenticated.
    Undecryptable,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Fully generic message.
    Generic {
        /// Stage that fell back.
        reason: FallbackReason,
    },
    /// Generic message greeting the recipient id.
    Greeting {
        /// Name to greet (the recipient id).
        display_name: String,
        /// Stage that fell back.
        reason: FallbackReason,
    },
    /// Decrypted name and message.
    Personalized {
        /// The decoded payload.
        payload: PlaintextPayload,
    },
}

impl Resolution {
    /// Display category of this outcome.
    pub fn kind(&self) -> DisplayKind {
        match self {
            Resolution::Generic { .. } => DisplayKind::Generic,
            Resolution::Greeting { .. } => DisplayKind::Greeting,
            Resolution::Personalized { .. } => DisplayKind::Personalized,
        }
    }

    /// The two-way form used by simpler viewers: greetings become generic.
    pub fn collapsed(self) -> Self {
        match self {
            Resolution::Greeting { reason, .. } => Resolution::Generic { reason },
            other => other,
        }
    }

    /// Render as the viewer API body, using `generic_message` for fallbacks.
    pub fn to_display(&self, generic_message: &str) -> DisplayResponse {
        let (display_name, message) = match self {
            Resolution::Generic { .. } => (None, generic_message.to_owned()),
            Resolution::Greeting { display_name, .. } => {
                (Some(display_name.clone()), generic_message.to_owned())
            }
            Resolution::Personalized { payload } => {
                (Some(payload.display_name.clone()), payload.message.clone())
            }
        };
        DisplayResponse {
            kind: self.kind(),
            display_name,
            message,
        }
    }
}

/// Run the decode decision tree for `params` against `source`.
///
/// The store is fetched at most once, and only when both id and key are
/// present. Key derivation and decryption run on the blocking pool.
pub async fn resolve<S>(params: &LinkParams, source: &S) -> Resolution
where
    S: RecordSource + ?Sized,
{
    let Some(recipient_id) = params.recipient_id.as_deref() else {
        return Resolution::Generic {
            reason: FallbackReason::MissingRecipient,
        };
    };
    let greeting = |reason| Resolution::Greeting {
        display_name: recipient_id.to_owned(),
        reason,
    };

    let Some(key) = params.key.as_deref() else {
        return greeting(FallbackReason::MissingKey);
    };

    let store = match source.fetch().await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to fetch record store");
            return Resolution::Generic {
                reason: FallbackReason::StoreUnavailable,
            };
        }
    };

    let record = match store.entry(recipient_id) {
        None => {
            warn!(recipient_id, "no record found for recipient");
            return greeting(FallbackReason::UnknownRecipient);
        }
        Some(StoreEntry::Malformed(_)) => {
            warn!(recipient_id, "record store entry is malformed");
            return greeting(FallbackReason::Undecryptable);
        }
        Some(StoreEntry::Record(record)) => record.clone(),
    };

    let key = LinkKey::from_encoded(key);
    let opened = tokio::task::spawn_blocking(move || envelope::open(&record, key.as_str())).await;

    match opened {
        Ok(Ok(text)) if text.is_empty() => {
            warn!(recipient_id, "record opened to empty plaintext");
            greeting(FallbackReason::Undecryptable)
        }
        Ok(Ok(text)) => {
            debug!(recipient_id, "record opened");
            Resolution::Personalized {
                payload: PlaintextPayload::from_decrypted(&text, recipient_id),
            }
        }
        Ok(Err(e)) => {
            warn!(recipient_id, error = %e, "record could not be opened");
            greeting(FallbackReason::Undecryptable)
        }
        Err(e) => {
            error!(recipient_id, error = %e, "decrypt task failed");
            greeting(FallbackReason::Undecryptable)
        }
    }
}
