//! File discovery and per-file processing.

use chatidx_core::{FileRecord, Message};
use chatidx_index::file_timestamp;
use chatidx_llm::LlmClient;
use chatidx_parse::ParserRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Summary recorded when a file parses to zero messages.
const NO_CONTENT_SUMMARY: &str = "No content could be extracted from this file.";

/// Walk the tree once and collect every file whose name ends with one of
/// the configured extensions, in walk order.
pub fn discover_files(input_dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    // Accept bare extensions too; matching is against the dotted form.
    let normalized: Vec<String> = extensions
        .iter()
        .map(|ext| {
            if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{}", ext)
            }
        })
        .collect();

    let files: Vec<PathBuf> = WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            normalized.iter().any(|ext| name.ends_with(ext.as_str()))
        })
        .map(|entry| entry.into_path())
        .collect();

    info!(
        "Found {} chat files to process under {}",
        files.len(),
        input_dir.display()
    );
    files
}

/// Process every discovered file, one at a time, and return one record
/// per file. An empty result means nothing matched the extension list.
pub async fn run(
    input_dir: &Path,
    extensions: &[String],
    client: &LlmClient,
    max_topics: usize,
) -> Vec<FileRecord> {
    let files = discover_files(input_dir, extensions);
    if files.is_empty() {
        warn!(
            "No chat files found in {} with extensions: {}",
            input_dir.display(),
            extensions.join(", ")
        );
        return Vec::new();
    }

    let registry = ParserRegistry::with_default_parsers();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        pb.set_message(filename.clone());

        records.push(process_file(&path, filename, &registry, client, max_topics).await);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    records
}

/// Produce the record for one file. Errors never propagate out of here;
/// they are logged and described in the record's summary instead.
async fn process_file(
    path: &Path,
    filename: String,
    registry: &ParserRegistry,
    client: &LlmClient,
    max_topics: usize,
) -> FileRecord {
    info!("Processing file: {}", path.display());

    let record = FileRecord::new(filename, path.display().to_string())
        .with_timestamp(file_timestamp(path));

    let content = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            error!("Error processing file {}: {}", path.display(), e);
            return record.with_summary(format!(
                "Error processing file: {}. Check logs for details.",
                e
            ));
        }
    };

    let messages: Vec<Message> = registry.extract_messages(path, &content);
    if messages.is_empty() {
        warn!("No messages extracted from {}", path.display());
        return record.with_summary(NO_CONTENT_SUMMARY);
    }

    let topics = client.extract_topics(&messages, max_topics).await;
    let summary = client.summarize(&messages).await;

    record
        .with_message_count(messages.len())
        .with_topics(topics)
        .with_summary(summary)
}
