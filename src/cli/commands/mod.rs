//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command.

pub mod completions;
pub mod config;
pub mod index;
pub mod provision;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use index::IndexArgs;
pub use provision::ProvisionArgs;

use crate::core::config::Config;
use clap::Args;

/// Vector store overrides shared by commands that talk to Qdrant
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Target collection (overrides qdrant.collection)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,

    /// Qdrant URL (overrides qdrant.url)
    #[arg(long)]
    pub qdrant_url: Option<String>,
}

impl StoreArgs {
    /// Apply the overrides to `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(collection) = &self.collection {
            config.qdrant.collection = collection.clone();
        }
        if let Some(url) = &self.qdrant_url {
            config.qdrant.url = Some(url.clone());
        }
    }
}
