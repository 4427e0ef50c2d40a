//! Subcommand implementations composing the chat session and file cache.

use std::io::{BufRead, Write};
use std::path::Path;

use pdfpal_chat::{ChatError, ChatSession, HttpChatBackend, TurnEvent};
use pdfpal_common::{PdfPalError, Result};
use pdfpal_config::SettingsStore;
use pdfpal_files::{DiskKvStore, FileBackend, FileInfo, FileListCache, HttpFileBackend};

use crate::cli::Command;

pub async fn run(command: &Command, store: &SettingsStore) -> Result<()> {
    let settings = store.current();
    match command {
        Command::Chat { document } => chat(&settings.backend.url, document.as_deref()).await,
        Command::Files { no_cache } => files(&settings.backend.url, *no_cache).await,
        Command::Delete { filename } => delete(&settings.backend.url, filename).await,
        Command::Upload { path } => upload(&settings.backend.url, Path::new(path)).await,
    }
}

fn open_cache(base_url: &str) -> Result<(FileListCache<DiskKvStore>, HttpFileBackend)> {
    let store = DiskKvStore::open_default().map_err(|e| PdfPalError::Files(e.to_string()))?;
    Ok((FileListCache::new(store), HttpFileBackend::new(base_url)))
}

async fn chat(base_url: &str, document: Option<&str>) -> Result<()> {
    let backend = HttpChatBackend::new(base_url);
    let mut session = ChatSession::new();

    match document {
        Some(doc) => println!("Chatting about {doc}. Ctrl-D to quit."),
        None => println!("General chat, no document context. Ctrl-D to quit."),
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut question = String::new();
        if stdin.lock().read_line(&mut question)? == 0 {
            println!();
            return Ok(());
        }
        if question.trim().is_empty() {
            continue;
        }

        let outcome = session
            .submit(&backend, &question, document, |event| {
                if let TurnEvent::Chunk(chunk) = event {
                    print!("{chunk}");
                    let _ = std::io::stdout().flush();
                }
            })
            .await;

        match outcome {
            Ok(_) => println!(),
            // The failed answer is already in the log; show the cause too.
            Err(ChatError::Api(e)) | Err(ChatError::Network(e)) => {
                println!();
                eprintln!("turn failed: {e}");
            }
            Err(e) => return Err(PdfPalError::Chat(e.to_string())),
        }
    }
}

async fn files(base_url: &str, no_cache: bool) -> Result<()> {
    let (mut cache, backend) = open_cache(base_url)?;

    if no_cache {
        cache.invalidate();
    }

    if no_cache || cache.load().is_none() {
        cache
            .refresh(&backend, no_cache)
            .await
            .map_err(|e| PdfPalError::Files(e.to_string()))?;
    }

    print_file_list(cache.files());
    Ok(())
}

async fn delete(base_url: &str, filename: &str) -> Result<()> {
    let (mut cache, backend) = open_cache(base_url)?;

    // Populate the list first so the incremental cache rewrite is accurate.
    if cache.load().is_none() {
        cache
            .refresh(&backend, false)
            .await
            .map_err(|e| PdfPalError::Files(e.to_string()))?;
    }

    cache
        .remove(&backend, filename)
        .await
        .map_err(|e| PdfPalError::Files(e.to_string()))?;

    println!("Deleted {filename}. {} file(s) remain.", cache.files().len());
    Ok(())
}

async fn upload(base_url: &str, path: &Path) -> Result<()> {
    let (mut cache, backend) = open_cache(base_url)?;

    let receipt = backend
        .upload(path)
        .await
        .map_err(|e| PdfPalError::Files(e.to_string()))?;

    println!("Uploaded {}.", receipt.filename);
    if let Some(summary) = &receipt.summary {
        println!("\n{summary}");
    }

    // The server list changed; drop the cache and re-fetch.
    cache.invalidate();
    cache
        .refresh(&backend, true)
        .await
        .map_err(|e| PdfPalError::Files(e.to_string()))?;

    Ok(())
}

fn print_file_list(files: &[FileInfo]) {
    if files.is_empty() {
        println!("No files uploaded yet.");
        return;
    }
    for info in files {
        println!("{:>12}  {}", info.size, info.filename);
    }
}
