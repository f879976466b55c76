//! Subcommand implementations.
//!
//! Each command returns the text meant for stdout. Sealing runs on the
//! blocking pool since every message costs a full key derivation.

use std::{io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use common::{encode_batch, encode_message, resolve, FileRecordSource, LinkParams, RecordStore, Resolution};
use serde_json::Value;
use tracing::info;

use crate::cli::{BatchArgs, OpenArgs, SealArgs};

/// Printed instead of a link list when a batch seals nothing.
pub const NO_MESSAGES: &str = "(No valid messages found in file.)";

/// Seal a single message; returns the link and the store snippet.
pub async fn seal(args: SealArgs, base_url: String) -> Result<String> {
    let sealed = tokio::task::spawn_blocking(move || {
        encode_message(&args.id, args.display_name.as_deref(), &args.message, &base_url)
    })
    .await
    .context("sealing task failed")?
    .context("failed to seal message")?;

    info!(recipient_id = %sealed.recipient_id, "message sealed");
    Ok(format!(
        "Send this link to {}:\n{}\n\nAdd this inside messages-encrypted.json:\n\n{}",
        sealed.recipient_id,
        sealed.link,
        sealed.snippet()
    ))
}

/// Seal a batch file and write the store and link list.
///
/// The returned text is the link list followed by one `skipped:` line per
/// entry that could not be sealed.
///
/// Nothing is written when no entry could be sealed, so an existing store is
/// never replaced by an empty one.
pub async fn batch(args: BatchArgs, base_url: String) -> Result<String> {
    let raw = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let output = tokio::task::spawn_blocking(move || encode_batch(&input, &base_url))
        .await
        .context("batch sealing task failed")?
        .context("invalid batch input")?;

    let skipped: String = output
        .skipped
        .iter()
        .map(|entry| format!("\nskipped: {} ({})", entry.recipient_id, entry.reason))
        .collect();

    if output.links.is_empty() {
        info!(skipped = output.skipped.len(), "no messages sealed");
        return Ok(format!("{NO_MESSAGES}{skipped}"));
    }

    let mut store = if args.merge {
        load_store(&args.output).await?
    } else {
        RecordStore::new()
    };
    let sealed = output.store.len();
    let links = output.links_text();
    store.merge(output.store);

    let json = store.to_pretty_json().context("failed to serialise record store")?;
    write_file(&args.output, format!("{json}\n")).await?;
    write_file(&args.links, format!("{links}\n")).await?;

    info!(
        sealed,
        skipped = output.skipped.len(),
        total = store.len(),
        store = %args.output.display(),
        "batch written"
    );
    Ok(format!("{links}{skipped}"))
}

/// Resolve a link against a local store, the way the viewer would.
pub async fn open(args: &OpenArgs) -> Result<String> {
    let params = LinkParams::from_url(&args.link).context("not a usable link")?;
    let source = FileRecordSource::new(&args.store);
    let resolution = resolve(&params, &source).await;
    Ok(describe(&resolution))
}

fn describe(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Personalized { payload } => format!(
            "personalized\nname: {}\nmessage: {}",
            payload.display_name, payload.message
        ),
        Resolution::Greeting {
            display_name,
            reason,
        } => format!("greeting ({reason:?})\nname: {display_name}"),
        Resolution::Generic { reason } => format!("generic ({reason:?})"),
    }
}

/// Existing store at `path`, or an empty one if the file does not exist yet.
async fn load_store(path: &Path) -> Result<RecordStore> {
    match tokio::fs::read(path).await {
        Ok(bytes) => RecordStore::from_slice(&bytes)
            .with_context(|| format!("{} is not a record store", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RecordStore::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
