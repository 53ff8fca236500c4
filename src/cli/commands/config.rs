//! Config command - show the effective configuration

use crate::cli::output::{colors, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use clap::Args;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also list include/exclude patterns
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let shown = config.redacted();

    match format {
        OutputFormat::Human => {
            let unset = || "<unset>".to_string();
            println!("{}", colors::label("Configuration:"));
            println!("  qdrant:");
            println!("    url: {}", shown.qdrant.url.clone().unwrap_or_else(unset));
            println!(
                "    api_key: {}",
                shown.qdrant.api_key.clone().unwrap_or_else(unset)
            );
            println!(
                "    collection: {}",
                colors::collection(&shown.qdrant.collection)
            );
            println!("  embedding:");
            println!("    base_url: {}", shown.embedding.base_url);
            println!("    model: {}", shown.embedding.model);
            println!("    dimensions: {}", shown.embedding.dimensions);
            println!(
                "    api_key: {}",
                shown.embedding.api_key.clone().unwrap_or_else(unset)
            );
            println!("    concurrency: {}", shown.embedding.concurrency);
            println!("  indexing:");
            println!("    chunk_size: {}", shown.indexing.chunk_size);
            println!("    overlap: {}", shown.indexing.overlap);
            println!("    max_file_size_mb: {}", shown.indexing.max_file_size_mb);
            println!("    max_files: {}", shown.indexing.max_files);
            println!("    dedup: {}", shown.indexing.dedup);
            if let Some(author) = &shown.indexing.author {
                println!("    author: {author}");
            }
            if args.all {
                println!("    include: {:?}", shown.indexing.include_patterns);
                println!("    exclude: {:?}", shown.indexing.exclude_patterns);
            }
            if let Err(e) = config.check_required() {
                println!();
                println!("{}", colors::warning(&e.to_string()));
            }
        }
        OutputFormat::Json => print_json(&shown)?,
    }

    Ok(())
}
