//! End-to-end sender → store file → viewer scenarios.

use std::io::Write;

use common::{
    crypto::encoding, encode_batch, encode_message, resolve, FallbackReason, FileRecordSource,
    LinkParams, PlaintextPayload, RecordStore, Resolution,
};
use serde_json::json;

const BASE: &str = "https://cards.example.com/card.html";

fn write_store(store: &RecordStore) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(store.to_pretty_json().unwrap().as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn alice_sees_her_message() {
    let sealed = encode_message("alice", Some("Alice"), "Hi Alice", BASE).unwrap();
    let mut store = RecordStore::new();
    store.insert("alice", sealed.record.clone());
    let file = write_store(&store);

    let params = LinkParams::from_url(&sealed.link).unwrap();
    let resolved = resolve(&params, &FileRecordSource::new(file.path())).await;

    assert_eq!(
        resolved,
        Resolution::Personalized {
            payload: PlaintextPayload::new("Alice", "Hi Alice")
        }
    );
}

#[tokio::test]
async fn link_without_key_greets_recipient() {
    let file = write_store(&RecordStore::new());
    let params = LinkParams::from_query("id=alice");
    let resolved = resolve(&params, &FileRecordSource::new(file.path())).await;

    let display = resolved.to_display("Happy holidays");
    assert_eq!(display.display_name.as_deref(), Some("alice"));
    assert_eq!(display.message, "Happy holidays");
    assert!(matches!(
        resolved,
        Resolution::Greeting { reason: FallbackReason::MissingKey, .. }
    ));
}

#[tokio::test]
async fn unknown_recipient_greets_or_collapses() {
    let sealed = encode_message("alice", None, "hi", BASE).unwrap();
    let mut store = RecordStore::new();
    store.insert("alice", sealed.record);
    let file = write_store(&store);

    let params = LinkParams::new(Some("bob"), Some(sealed.link_key.as_str()));
    let resolved = resolve(&params, &FileRecordSource::new(file.path())).await;

    assert_eq!(
        resolved,
        Resolution::Greeting {
            display_name: "bob".into(),
            reason: FallbackReason::UnknownRecipient
        }
    );
    assert_eq!(
        resolved.collapsed(),
        Resolution::Generic {
            reason: FallbackReason::UnknownRecipient
        }
    );
}

#[tokio::test]
async fn missing_store_file_is_generic() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileRecordSource::new(dir.path().join("messages-encrypted.json"));
    let params = LinkParams::new(Some("alice"), Some("a2V5"));
    assert_eq!(
        resolve(&params, &source).await,
        Resolution::Generic {
            reason: FallbackReason::StoreUnavailable
        }
    );
}

#[tokio::test]
async fn batch_output_opens_for_carol() {
    let out = encode_batch(&json!({"carol": "Hello Carol"}), BASE).unwrap();

    assert_eq!(out.links.len(), 1);
    assert_eq!(out.links[0].0, "carol");
    assert!(out.links_text().starts_with("carol: https://cards.example.com/card.html?id=carol&k="));

    let record = out.store.get("carol").unwrap();
    assert_eq!(encoding::decode(&record.iv).unwrap().len(), 12);
    assert_eq!(encoding::decode(&record.salt).unwrap().len(), 16);
    assert!(encoding::decode(&record.ciphertext).unwrap().len() > 16);

    let file = write_store(&out.store);
    let params = LinkParams::from_url(&out.links[0].1).unwrap();
    let resolved = resolve(&params, &FileRecordSource::new(file.path())).await;
    assert_eq!(
        resolved,
        Resolution::Personalized {
            payload: PlaintextPayload::new("carol", "Hello Carol")
        }
    );
}

#[tokio::test]
async fn malformed_neighbours_do_not_affect_alice() {
    let sealed = encode_message("alice", Some("Alice"), "Hi Alice", BASE).unwrap();
    let contents = json!({
        "alice": sealed.record,
        "dave": "oops",
        "erin": {"iv": null},
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.to_string().as_bytes()).unwrap();
    let source = FileRecordSource::new(file.path());

    let params = LinkParams::from_url(&sealed.link).unwrap();
    assert_eq!(
        resolve(&params, &source).await,
        Resolution::Personalized {
            payload: PlaintextPayload::new("Alice", "Hi Alice")
        }
    );

    let params = LinkParams::new(Some("erin"), Some(sealed.link_key.as_str()));
    assert_eq!(
        resolve(&params, &source).await,
        Resolution::Greeting {
            display_name: "erin".into(),
            reason: FallbackReason::Undecryptable
        }
    );
}
