//! Command-line arguments for the `docdesk` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "docdesk",
    version,
    about = "Upload PDFs to the document-analysis service and ask questions about them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Service base URL (overrides DOCDESK_BASE_URL).
    #[arg(long = "base-url", global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides DOCDESK_TIMEOUT_SECS).
    #[arg(long = "timeout", global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file.
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List uploaded documents.
    List(ListArgs),
    /// Upload a PDF and optionally wait for processing to finish.
    Upload(UploadArgs),
    /// Show one document's details.
    Show { document_id: String },
    /// Ask one or more questions about a document.
    Ask(AskArgs),
    /// Generate a summary of a processed document.
    Summary { document_id: String },
    /// Delete a document.
    Delete { document_id: String },
    /// Poll a document until processing completes or fails.
    Watch(WatchArgs),
    /// Check that the service is up.
    Health,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show documents that finished processing.
    #[arg(long, conflicts_with = "processing")]
    pub completed: bool,
    /// Only show documents currently being processed.
    #[arg(long)]
    pub processing: bool,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    pub path: PathBuf,
    /// Poll until the service finishes processing the upload.
    #[arg(long)]
    pub wait: bool,
    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    pub document_id: String,
    /// Questions are asked in order against the same selection.
    #[arg(required = true)]
    pub questions: Vec<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    pub document_id: String,
    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PollArgs {
    /// Seconds between status checks.
    #[arg(long = "interval", default_value_t = 2)]
    pub interval_secs: u64,
    /// Give up after this many checks.
    #[arg(long = "max-polls", default_value_t = 150)]
    pub max_polls: u32,
}
