use clap::{Parser, Subcommand};

/// PDF Pal — upload PDFs and chat with an assistant about their contents.
#[derive(Parser, Debug)]
#[command(name = "pdfpal", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat. Answers stream to stdout as they arrive.
    Chat {
        /// Scope questions to one uploaded document.
        #[arg(short, long)]
        document: Option<String>,
    },
    /// List uploaded files, served from the local cache when fresh.
    Files {
        /// Skip the cache and fetch the authoritative list.
        #[arg(long)]
        no_cache: bool,
    },
    /// Delete an uploaded file.
    Delete { filename: String },
    /// Upload a PDF for processing.
    Upload { path: String },
}

pub fn parse() -> Args {
    Args::parse()
}
