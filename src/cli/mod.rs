//! CLI adapter for codevec
//!
//! Thin clap layer over `core/`: parses arguments, applies them on top
//! of the loaded configuration and prints results.

pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};

/// codevec - index source trees into a Qdrant collection
///
/// Splits files into overlapping chunks, embeds each chunk and stores
/// the vectors in Qdrant. Unchanged files are skipped on later runs.
#[derive(Parser, Debug)]
#[command(name = "codevec")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Index source code into a vector database", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log line format (log level is controlled by RUST_LOG)
    #[arg(long, global = true, default_value = "human")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Format of the diagnostic log written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory into the configured collection
    Index(commands::IndexArgs),

    /// Create or validate the target collection without indexing
    Provision(commands::ProvisionArgs),

    /// Show the effective configuration (secrets redacted)
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  codevec completions bash > ~/.local/share/bash-completion/completions/codevec
    ///   zsh:   codevec completions zsh > ~/.zfunc/_codevec
    ///   fish:  codevec completions fish > ~/.config/fish/completions/codevec.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::XdgDirs;

    // Handle completions command early (doesn't need config)
    let command = match cli.command {
        Commands::Completions(args) => return commands::completions::execute(args),
        other => other,
    };

    let xdg = XdgDirs::new();
    xdg.log_paths();
    let config = Config::load_with_xdg(&xdg)?;

    match command {
        Commands::Index(args) => commands::index::execute(args, config, cli.format).await,
        Commands::Provision(args) => commands::provision::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
