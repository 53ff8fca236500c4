//! Index command - index a directory into the vector store

use crate::cli::commands::StoreArgs;
use crate::cli::output::{colors, format_duration, print_json, print_warning};
use crate::cli::progress::CliProgress;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::indexer::DedupPolicy;
use crate::core::services::Services;
use clap::Args;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory to index
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Glob patterns to include (can be specified multiple times)
    #[arg(long, short = 'i')]
    pub include: Vec<String>,

    /// Glob patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// Stop after this many files (0 = unlimited)
    #[arg(long)]
    pub max_files: Option<usize>,

    /// When to skip a file: unchanged, fingerprint, path-or-fingerprint, never
    #[arg(long)]
    pub dedup: Option<DedupPolicy>,

    /// Author stored with every chunk
    #[arg(long)]
    pub author: Option<String>,

    /// Print one line per file
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl IndexArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        self.store.apply(config);

        let indexing = &mut config.indexing;
        if let Some(size) = self.chunk_size {
            indexing.chunk_size = size;
        }
        if let Some(overlap) = self.overlap {
            indexing.overlap = overlap;
        }
        if !self.include.is_empty() {
            indexing.include_patterns = self.include.clone();
        }
        if !self.exclude.is_empty() {
            indexing.exclude_patterns = self.exclude.clone();
        }
        if let Some(max_files) = self.max_files {
            indexing.max_files = max_files;
        }
        if let Some(dedup) = self.dedup {
            indexing.dedup = dedup;
        }
        if self.author.is_some() {
            indexing.author = self.author.clone();
        }
    }
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;
    config.log_config();

    let path = args.path.canonicalize().map_err(|e| {
        format!(
            "Invalid path '{}': {}. Make sure the path exists and is accessible.",
            args.path.display(),
            e
        )
    })?;
    if !path.is_dir() {
        return Err(format!("Path '{}' is not a directory.", path.display()).into());
    }

    let services = Services::from_config(config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current file");
            on_signal.cancel();
        }
    });

    let progress = CliProgress {
        verbose: args.verbose,
        quiet: args.quiet || format == OutputFormat::Json,
    };
    let stats = services.index_directory(&path, &progress, &cancel).await?;

    match format {
        OutputFormat::Human => {
            let secs = stats.duration_ms as f64 / 1000.0;
            println!(
                "{} {} files ({} chunks) into {} in {}",
                colors::success("Indexed"),
                colors::number(&stats.files_indexed.to_string()),
                colors::number(&stats.chunks_upserted.to_string()),
                colors::collection(&stats.collection),
                colors::number(&format_duration(secs))
            );
            println!(
                "{} unchanged, {} empty, {} failed",
                colors::number(&stats.files_unchanged.to_string()),
                colors::number(&stats.files_empty.to_string()),
                colors::number(&stats.files_failed.to_string())
            );
            if stats.truncated {
                print_warning("file limit reached; raise --max-files to index the rest");
            }
            if stats.cancelled {
                print_warning("run was cancelled before all files were processed");
            }
        }
        OutputFormat::Json => print_json(&stats)?,
    }

    if stats.files_failed > 0 {
        return Err(format!("{} files failed to index", stats.files_failed).into());
    }

    Ok(())
}
