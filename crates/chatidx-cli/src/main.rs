//! Chatidx CLI - Index chat transcripts into a JSON index and Markdown digest.

mod pipeline;

use anyhow::{Context, Result};
use chatidx_config::{parse_extensions, Config};
use chatidx_core::{IndexDocument, IndexMetadata};
use chatidx_index::IndexBuilder;
use chatidx_llm::LlmClient;
use clap::Parser;
use colored::Colorize;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Chatidx - Index chat transcripts into a JSON index and Markdown digest
#[derive(Parser)]
#[command(name = "chatidx")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Index chat transcripts into a JSON index and Markdown digest", long_about = None)]
struct Cli {
    /// Directory containing chat files to process
    #[arg(short, long, env = "BASE_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory to store output files
    #[arg(short, long, env = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Comma-separated list of supported file extensions
    #[arg(short, long, env = "SUPPORTED_FILE_EXTENSIONS")]
    extensions: Option<String>,

    /// LLM provider (model identifier) to use
    #[arg(short, long, env = "LLM_PROVIDER")]
    provider: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Fold command-line flags over the environment-derived configuration.
    fn apply(self, mut config: Config) -> Config {
        if let Some(input_dir) = self.input_dir {
            config.base_dir = input_dir;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(extensions) = self.extensions {
            config.supported_extensions = parse_extensions(&extensions);
        }
        if let Some(provider) = self.provider {
            config.llm_provider = provider;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config
    }
}

/// Configure tracing with a console layer and a file layer appending to
/// the configured log file. `RUST_LOG` wins over the configured level.
fn init_logging(config: &Config) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(())
}

fn run() -> Result<()> {
    // Load .env before clap resolves env-backed flags.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = cli.apply(Config::from_env());

    init_logging(&config)?;
    info!("Starting chat transcript indexing");

    if config.supported_extensions.is_empty() {
        warn!("No valid file extensions provided. Using default extensions.");
        config.supported_extensions = Config::default().supported_extensions;
    }

    info!("Input directory: {}", config.base_dir.display());
    info!("Output directory: {}", config.output_dir.display());
    info!("Supported extensions: {}", config.supported_extensions.join(", "));
    info!("LLM provider: {}", config.llm_provider);

    let api_key = config.require_api_key()?;
    let client =
        LlmClient::new(&config.llm_provider, api_key)?.with_base_url(&config.llm_api_base);

    println!(
        "{} {}",
        "Indexing chat files under".bold(),
        config.base_dir.display()
    );

    let rt = Runtime::new().context("Failed to create async runtime")?;
    let records = rt.block_on(pipeline::run(
        &config.base_dir,
        &config.supported_extensions,
        &client,
        config.max_topic_keywords,
    ));

    if records.is_empty() {
        anyhow::bail!(
            "No chat files found in {} with extensions: {}",
            config.base_dir.display(),
            config.supported_extensions.join(", ")
        );
    }

    let total = records.len();
    let document =
        IndexDocument::new(records).with_metadata(IndexMetadata::new(total, &config.llm_provider));

    let builder = IndexBuilder::new(
        &config.output_dir,
        &config.index_filename,
        &config.summary_filename,
    )?;
    builder
        .build(document)
        .context("Failed to write the index outputs")?;

    info!("Chat indexing completed successfully");
    println!("{} {} files indexed", "Done:".green().bold(), total);
    println!("  {} {}", "Index:".bold(), builder.index_path().display());
    println!("  {} {}", "Digest:".bold(), builder.summary_path().display());

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
