//! Configuration structure and environment loading.

use crate::error::{ConfigError, ConfigResult};
use std::path::PathBuf;
use tracing::warn;

/// Main configuration, sourced from environment variables.
///
/// Every value has a documented default; only the API credential is
/// required, and only once a remote call is actually about to happen.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory scanned for transcript files.
    pub base_dir: PathBuf,
    /// Directory the index and digest are written to.
    pub output_dir: PathBuf,
    /// Filename of the JSON index inside `output_dir`.
    pub index_filename: String,
    /// Filename of the Markdown digest inside `output_dir`.
    pub summary_filename: String,
    /// Model identifier passed through to the LLM gateway.
    pub llm_provider: String,
    /// Credential for the LLM gateway.
    pub llm_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible gateway.
    pub llm_api_base: String,
    /// Comma-separated extension list, already split and normalized.
    pub supported_extensions: Vec<String>,
    /// Upper bound on topics extracted per file.
    pub max_topic_keywords: usize,
    /// Log verbosity name (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log file path; parent directories are created at startup.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./output"),
            index_filename: "chat_index.json".to_string(),
            summary_filename: "chat_summaries.md".to_string(),
            llm_provider: "google/gemini-2.0-flash-001".to_string(),
            llm_api_key: None,
            llm_api_base: "https://openrouter.ai/api/v1".to_string(),
            supported_extensions: parse_extensions(".txt,.md,.json,.html,.csv"),
            max_topic_keywords: 5,
            log_level: "info".to_string(),
            log_file: PathBuf::from("logs/chat_indexer.log"),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_dir: env_var("BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.base_dir),
            output_dir: env_var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            index_filename: env_var("INDEX_FILENAME").unwrap_or(defaults.index_filename),
            summary_filename: env_var("SUMMARY_FILENAME").unwrap_or(defaults.summary_filename),
            llm_provider: env_var("LLM_PROVIDER").unwrap_or(defaults.llm_provider),
            llm_api_key: env_var("LLM_API_KEY"),
            llm_api_base: env_var("LLM_API_BASE").unwrap_or(defaults.llm_api_base),
            supported_extensions: env_var("SUPPORTED_FILE_EXTENSIONS")
                .map(|s| parse_extensions(&s))
                .unwrap_or(defaults.supported_extensions),
            max_topic_keywords: env_var("MAX_TOPIC_KEYWORDS")
                .map(|s| parse_max_keywords(&s, defaults.max_topic_keywords))
                .unwrap_or(defaults.max_topic_keywords),
            log_level: env_var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_file: env_var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }

    /// Return the API credential or fail if it is absent.
    pub fn require_api_key(&self) -> ConfigResult<&str> {
        self.llm_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_max_keywords(raw: &str, default: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(n) => n.max(1),
        Err(_) => {
            warn!("Invalid MAX_TOPIC_KEYWORDS value '{}', using {}", raw, default);
            default
        }
    }
}

/// Split a comma-separated extension list and normalize each entry to a
/// dotted form (".md" from "md").
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim())
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.index_filename, "chat_index.json");
        assert_eq!(config.summary_filename, "chat_summaries.md");
        assert_eq!(config.max_topic_keywords, 5);
        assert_eq!(
            config.supported_extensions,
            vec![".txt", ".md", ".json", ".html", ".csv"]
        );
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_parse_extensions_normalizes_dots() {
        let exts = parse_extensions("txt, .md ,json,,  ");
        assert_eq!(exts, vec![".txt", ".md", ".json"]);
    }

    #[test]
    fn test_parse_max_keywords() {
        assert_eq!(parse_max_keywords("7", 5), 7);
        assert_eq!(parse_max_keywords("0", 5), 1);
        assert_eq!(parse_max_keywords("banana", 5), 5);
    }

    #[test]
    fn test_require_api_key() {
        let mut config = Config::default();
        assert!(config.require_api_key().is_err());

        config.llm_api_key = Some(String::new());
        assert!(config.require_api_key().is_err());

        config.llm_api_key = Some("sk-test".to_string());
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    // Env-dependent checks live in one test so no other test races them.
    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("BASE_DIR", "/tmp/transcripts");
        std::env::set_var("MAX_TOPIC_KEYWORDS", "9");
        std::env::set_var("SUPPORTED_FILE_EXTENSIONS", "txt,md");

        let config = Config::from_env();
        assert_eq!(config.base_dir, PathBuf::from("/tmp/transcripts"));
        assert_eq!(config.max_topic_keywords, 9);
        assert_eq!(config.supported_extensions, vec![".txt", ".md"]);

        std::env::remove_var("BASE_DIR");
        std::env::remove_var("MAX_TOPIC_KEYWORDS");
        std::env::remove_var("SUPPORTED_FILE_EXTENSIONS");
    }
}
