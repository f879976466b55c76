//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::{FileRecordSource, RecordSource};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so Axum can clone the state per request.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Where the record store is fetched from on each resolution.
    pub source: Arc<dyn RecordSource>,
    /// Text shown when no personal message can be displayed.
    pub generic_message: Arc<String>,
    /// Replace greetings by id with the fully generic display.
    pub collapse_fallbacks: bool,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(
        source: Arc<dyn RecordSource>,
        generic_message: String,
        collapse_fallbacks: bool,
    ) -> Self {
        Self {
            source,
            generic_message: Arc::new(generic_message),
            collapse_fallbacks,
        }
    }
}

impl Default for AppState {
    /// Reads `messages-encrypted.json` from the working directory; suitable for tests.
    fn default() -> Self {
        Self::new(
            Arc::new(FileRecordSource::new("messages-encrypted.json")),
            "Wishing you all the best!".into(),
            false,
        )
    }
}
