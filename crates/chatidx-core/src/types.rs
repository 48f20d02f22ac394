//! Core domain types for the transcript indexing pipeline.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single message extracted from a transcript file.
///
/// Messages are opaque text; speaker/role metadata from structured formats
/// is collapsed to the content string.
pub type Message = String;

/// Per-file indexing result.
///
/// Created once per discovered file and never mutated afterwards. The
/// `formatted_date` field is derived from `timestamp` by the index builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub filename: String,
    pub path: String,
    /// ISO-8601 modification time, or empty when unavailable.
    pub timestamp: String,
    pub topics: Vec<String>,
    pub summary: String,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
}

impl FileRecord {
    pub fn new(filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            timestamp: String::new(),
            topics: Vec::new(),
            summary: String::new(),
            message_count: 0,
            formatted_date: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }
}

/// Run-level metadata included in the JSON index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub total_files: usize,
    pub generated_at: String,
    pub llm_provider: String,
}

impl IndexMetadata {
    pub fn new(total_files: usize, llm_provider: impl Into<String>) -> Self {
        Self {
            total_files,
            generated_at: Utc::now().to_rfc3339(),
            llm_provider: llm_provider.into(),
        }
    }
}

/// The complete index assembled at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    pub files: Vec<FileRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMetadata>,
}

impl IndexDocument {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: IndexMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
