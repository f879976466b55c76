//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "generator")]
#[command(about = "Seal personal messages and produce share links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seal one message and print its link and store entry
    Seal(SealArgs),

    /// Seal every message in a JSON file
    Batch(BatchArgs),

    /// Check what a link shows against a store file
    Open(OpenArgs),
}

#[derive(Debug, Args)]
pub struct SealArgs {
    /// Recipient identifier used in the link and the store
    #[arg(long)]
    pub id: String,

    /// Name to greet the recipient with (defaults to the id)
    #[arg(long)]
    pub display_name: Option<String>,

    /// Message text
    #[arg(long)]
    pub message: String,

    /// Viewer page URL the link points at (defaults to BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON object mapping ids to a message or {displayName, message}
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the record store
    #[arg(short, long, default_value = "messages-encrypted.json")]
    pub output: PathBuf,

    /// Where to write the `id: link` list
    #[arg(short, long, default_value = "links.txt")]
    pub links: PathBuf,

    /// Add to the records already in the output store instead of replacing it
    #[arg(long)]
    pub merge: bool,

    /// Viewer page URL the links point at (defaults to BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Record store file to resolve against
    #[arg(short, long, default_value = "messages-encrypted.json")]
    pub store: PathBuf,

    /// Full share link
    #[arg(long)]
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn batch_defaults() {
        let cli = Cli::try_parse_from(["generator", "batch", "--input", "people.json"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.output, PathBuf::from("messages-encrypted.json"));
        assert_eq!(args.links, PathBuf::from("links.txt"));
        assert!(!args.merge);
        assert_eq!(args.base_url, None);
    }

    #[test]
    fn seal_requires_message() {
        assert!(Cli::try_parse_from(["generator", "seal", "--id", "alice"]).is_err());
    }
}
