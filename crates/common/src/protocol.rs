//! Wire types exchanged between the Encoder, the record store, and the viewer.
//!
//! Record types are serialised exactly as the store file holds them; the
//! response types are the viewer's JSON API bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// One recipient's encrypted message, as stored in the record store.
///
/// All three fields are standard base64. Missing fields deserialise as empty
/// strings, so such a record only fails when it is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptedRecord {
    /// 12-byte AES-GCM nonce.
    pub iv: String,
    /// 16-byte PBKDF2 salt.
    pub salt: String,
    /// Ciphertext with the 16-byte tag appended.
    pub ciphertext: String,
}

impl EncryptedRecord {
    /// Render `"<id>": { ... }` for pasting into a store file by hand.
    pub fn snippet(&self, recipient_id: &str) -> String {
        let key = serde_json::Value::String(recipient_id.to_owned());
        let body = serde_json::to_string_pretty(self).unwrap_or_default();
        format!("{key}: {body}")
    }
}

/// One value of the record store.
///
/// Entries are decoded independently: a value that is not a record (wrong
/// field types, not an object) is kept verbatim as [`StoreEntry::Malformed`]
/// and only affects its own recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreEntry {
    /// A well-formed record.
    Record(EncryptedRecord),
    /// Anything else, preserved as written.
    Malformed(serde_json::Value),
}

impl StoreEntry {
    /// The record, if this entry is well formed.
    pub fn record(&self) -> Option<&EncryptedRecord> {
        match self {
            StoreEntry::Record(record) => Some(record),
            StoreEntry::Malformed(_) => None,
        }
    }
}

/// Recipient identifier → [`StoreEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore(BTreeMap<String, StoreEntry>);

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `bytes` is not valid JSON or not a JSON
    /// object. Malformed entries inside the object are not an error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialise with two-space indentation, as written to disk.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up the entry for `recipient_id`, well formed or not.
    pub fn entry(&self, recipient_id: &str) -> Option<&StoreEntry> {
        self.0.get(recipient_id)
    }

    /// Look up the well-formed record for `recipient_id`.
    pub fn get(&self, recipient_id: &str) -> Option<&EncryptedRecord> {
        self.entry(recipient_id).and_then(StoreEntry::record)
    }

    /// Insert or replace the record for `recipient_id`.
    pub fn insert(&mut self, recipient_id: impl Into<String>, record: EncryptedRecord) {
        self.0.insert(recipient_id.into(), StoreEntry::Record(record));
    }

    /// Fold `other` into this store; records in `other` win on conflict.
    pub fn merge(&mut self, other: RecordStore) {
        self.0.extend(other.0);
    }

    /// Number of entries, malformed ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Plaintext payload
// ---------------------------------------------------------------------------

/// The text inside a record once decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaintextPayload {
    /// Name used in the greeting.
    pub display_name: String,
    /// The personal message.
    pub message: String,
}

impl PlaintextPayload {
    /// Construct a payload.
    pub fn new(display_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            message: message.into(),
        }
    }

    /// Compact JSON with `displayName` before `message`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Interpret decrypted text, accepting both payload forms.
    ///
    /// A JSON object contributes a non-blank string `displayName` (trimmed)
    /// and a string `message`; anything it lacks, and any text that is not a
    /// JSON object at all, falls back to `recipient_id` and the whole text.
    pub fn from_decrypted(text: &str, recipient_id: &str) -> Self {
        let mut payload = Self::new(recipient_id, text);
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(text) {
            if let Some(name) = map.get("displayName").and_then(|v| v.as_str()) {
                let name = name.trim();
                if !name.is_empty() {
                    payload.display_name = name.to_owned();
                }
            }
            if let Some(message) = map.get("message").and_then(|v| v.as_str()) {
                payload.message = message.to_owned();
            }
        }
        payload
    }
}

// ---------------------------------------------------------------------------
// Viewer API
// ---------------------------------------------------------------------------

/// Which kind of display the viewer resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// No personalisation at all.
    Generic,
    /// Greeting by recipient id, generic text.
    Greeting,
    /// Decrypted name and message.
    Personalized,
}

/// Response body for `GET /message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResponse {
    /// Display category.
    pub kind: DisplayKind,
    /// Name to greet; absent for [`DisplayKind::Generic`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Text to show.
    pub message: String,
}

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Where the record store is fetched from.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_fields_serialise_in_store_order() {
        let r = EncryptedRecord {
            iv: "i".into(),
            salt: "s".into(),
            ciphertext: "c".into(),
        };
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"iv":"i","salt":"s","ciphertext":"c"}"#
        );
    }

    #[test]
    fn snippet_matches_hand_edit_format() {
        let r = EncryptedRecord {
            iv: "aXY=".into(),
            salt: "c2FsdA==".into(),
            ciphertext: "Y3Q=".into(),
        };
        assert_eq!(
            r.snippet("alice"),
            "\"alice\": {\n  \"iv\": \"aXY=\",\n  \"salt\": \"c2FsdA==\",\n  \"ciphertext\": \"Y3Q=\"\n}"
        );
    }

    #[test]
    fn store_parses_and_tolerates_missing_fields() {
        let store = RecordStore::from_slice(
            br#"{"alice": {"iv": "a", "salt": "b", "ciphertext": "c"}, "bob": {}}"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("alice").unwrap().salt, "b");
        assert_eq!(store.get("bob").unwrap(), &EncryptedRecord::default());
        assert!(store.get("carol").is_none());
    }

    #[test]
    fn malformed_entries_stay_isolated() {
        let text = br#"{
            "alice": {"iv": "a", "salt": "b", "ciphertext": "c"},
            "dave": "oops",
            "erin": {"iv": null},
            "fay": {"iv": 7, "salt": "b", "ciphertext": "c"}
        }"#;
        let store = RecordStore::from_slice(text).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get("alice").unwrap().ciphertext, "c");
        for id in ["dave", "erin", "fay"] {
            assert!(matches!(store.entry(id), Some(StoreEntry::Malformed(_))), "{id}");
            assert!(store.get(id).is_none());
        }
    }

    #[test]
    fn malformed_entries_are_written_back_unchanged() {
        let store = RecordStore::from_slice(br#"{"dave": "oops", "erin": {"iv": null}}"#).unwrap();
        let again: serde_json::Value =
            serde_json::from_str(&store.to_pretty_json().unwrap()).unwrap();
        assert_eq!(again, json!({"dave": "oops", "erin": {"iv": null}}));
    }

    #[test]
    fn store_rejects_non_object() {
        assert!(RecordStore::from_slice(b"[1, 2]").is_err());
        assert!(RecordStore::from_slice(b"not json").is_err());
    }

    #[test]
    fn merge_overwrites_existing_ids() {
        let mut base = RecordStore::new();
        base.insert("alice", EncryptedRecord { iv: "old".into(), ..Default::default() });
        base.insert("bob", EncryptedRecord::default());
        let mut fresh = RecordStore::new();
        fresh.insert("alice", EncryptedRecord { iv: "new".into(), ..Default::default() });
        base.merge(fresh);
        assert_eq!(base.len(), 2);
        assert_eq!(base.get("alice").unwrap().iv, "new");
    }

    #[test]
    fn payload_serialises_compact_camel_case() {
        let p = PlaintextPayload::new("Alice", "Hi Alice");
        assert_eq!(
            p.to_json().unwrap(),
            r#"{"displayName":"Alice","message":"Hi Alice"}"#
        );
    }

    #[test]
    fn structured_payload_is_parsed() {
        let p = PlaintextPayload::from_decrypted(
            r#"{"displayName":"  Alice  ","message":"Hi Alice"}"#,
            "alice",
        );
        assert_eq!(p, PlaintextPayload::new("Alice", "Hi Alice"));
    }

    #[test]
    fn bare_string_is_legacy_message() {
        let p = PlaintextPayload::from_decrypted("Hello Carol", "carol");
        assert_eq!(p, PlaintextPayload::new("carol", "Hello Carol"));
    }

    #[test]
    fn partial_object_falls_back_per_field() {
        let blank_name = PlaintextPayload::from_decrypted(r#"{"displayName":"  ","message":"m"}"#, "id");
        assert_eq!(blank_name, PlaintextPayload::new("id", "m"));

        let text = r#"{"displayName":"Dee"}"#;
        let no_message = PlaintextPayload::from_decrypted(text, "id");
        assert_eq!(no_message, PlaintextPayload::new("Dee", text));

        let text = r#"{"displayName":5,"message":["x"]}"#;
        let wrong_types = PlaintextPayload::from_decrypted(text, "id");
        assert_eq!(wrong_types, PlaintextPayload::new("id", text));
    }

    #[test]
    fn json_non_object_is_whole_message() {
        let p = PlaintextPayload::from_decrypted(r#""quoted""#, "id");
        assert_eq!(p.message, r#""quoted""#);
        let p = PlaintextPayload::from_decrypted("42", "id");
        assert_eq!(p.message, "42");
    }

    #[test]
    fn display_response_omits_missing_name() {
        let body = DisplayResponse {
            kind: DisplayKind::Generic,
            display_name: None,
            message: "hello".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"kind": "generic", "message": "hello"})
        );
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("not_found", "no such route");
        assert_eq!(e.code, "not_found");
        assert!(e.message.contains("no such route"));
    }
}
