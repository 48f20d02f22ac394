//! Builds the persisted index artifacts from collected records.

use crate::error::{IndexError, IndexResult};
use chatidx_core::{FileRecord, IndexDocument};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Diagnostics file dropped next to the outputs when a build fails.
const ERROR_REPORT_FILENAME: &str = "index_error.log";

/// Writes a JSON index and a Markdown digest for one indexing run.
///
/// Construction validates the destination up front so no write is attempted
/// with an unusable configuration.
pub struct IndexBuilder {
    output_dir: PathBuf,
    index_filename: String,
    summary_filename: String,
}

impl IndexBuilder {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        index_filename: impl Into<String>,
        summary_filename: impl Into<String>,
    ) -> IndexResult<Self> {
        let output_dir: PathBuf = output_dir.into();
        if output_dir.as_os_str().is_empty() {
            return Err(IndexError::MissingOutputDir);
        }

        let index_filename = index_filename.into();
        let summary_filename = summary_filename.into();
        if index_filename.is_empty() || summary_filename.is_empty() {
            return Err(IndexError::MissingFilename);
        }

        Ok(Self {
            output_dir,
            index_filename,
            summary_filename,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_filename)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_filename)
    }

    /// Write the JSON index and the Markdown digest.
    ///
    /// Records with a parseable ISO-8601 timestamp get a human-readable
    /// `formatted_date` before serialization. On failure a best-effort
    /// error report is left in the output directory and the error is
    /// returned to the caller.
    pub fn build(&self, mut index: IndexDocument) -> IndexResult<()> {
        attach_formatted_dates(&mut index.files);

        match self.write_outputs(&index) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Error building index: {}", e);
                self.write_error_report(&e);
                Err(e)
            }
        }
    }

    fn write_outputs(&self, index: &IndexDocument) -> IndexResult<()> {
        fs::create_dir_all(&self.output_dir)?;

        let index_path = self.index_path();
        let json = serde_json::to_string_pretty(index)?;
        fs::write(&index_path, json)?;
        info!("JSON index written to {}", index_path.display());

        let summary_path = self.summary_path();
        fs::write(&summary_path, render_digest(&index.files))?;
        info!("Markdown summary written to {}", summary_path.display());

        Ok(())
    }

    /// Leave a small diagnostics file in the output directory. Failures
    /// here are logged and swallowed so they cannot mask the build error.
    fn write_error_report(&self, build_error: &IndexError) {
        let report = format!(
            "{} index build failed: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            build_error
        );
        let path = self.output_dir.join(ERROR_REPORT_FILENAME);
        if let Err(e) = fs::write(&path, report) {
            warn!("Could not write error report to {}: {}", path.display(), e);
        }
    }
}

fn attach_formatted_dates(records: &mut [FileRecord]) {
    for record in records {
        if record.timestamp.is_empty() {
            continue;
        }
        record.formatted_date = Some(format_timestamp(&record.timestamp));
    }
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM:SS`, keeping the raw
/// string when it does not parse.
fn format_timestamp(timestamp: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f"));

    match parsed {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => {
            warn!("Invalid timestamp format: {}", timestamp);
            timestamp.to_string()
        }
    }
}

/// Render the Markdown digest: title, generation time, table of contents,
/// then one section per record.
fn render_digest(records: &[FileRecord]) -> String {
    let mut out = String::new();
    out.push_str("# Chat Summaries\n\n");
    out.push_str(&format!(
        "*Generated: {}*\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("## Table of Contents\n\n");
    for record in records {
        out.push_str(&format!(
            "- [{}](#{})\n",
            record.filename,
            anchor(&record.filename)
        ));
    }
    out.push('\n');

    for record in records {
        out.push_str(&format!("## {}\n\n", record.filename));

        let date = record.formatted_date.as_deref().unwrap_or(&record.timestamp);
        if !date.is_empty() {
            out.push_str(&format!("**Date:** {}\n\n", date));
        }
        out.push_str(&format!("**Messages:** {}\n\n", record.message_count));
        if !record.topics.is_empty() {
            out.push_str(&format!("**Topics:** {}\n\n", record.topics.join(", ")));
        }
        out.push_str(&record.summary);
        out.push_str("\n\n---\n\n");
    }

    out
}

/// Anchor for a table-of-contents link: the lowercased filename with dots
/// and spaces replaced by dashes.
fn anchor(filename: &str) -> String {
    filename.to_lowercase().replace(['.', ' '], "-")
}

/// ISO-8601 timestamp from a file's modification time, or an empty string
/// when the metadata cannot be read.
pub fn file_timestamp(path: &Path) -> String {
    let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => mtime,
        Err(e) => {
            warn!(
                "Cannot read modification time for {}: {}",
                path.display(),
                e
            );
            return String::new();
        }
    };

    DateTime::<Local>::from(mtime)
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
