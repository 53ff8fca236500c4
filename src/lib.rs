//! codevec - incremental code indexing into a vector database
//!
//! Walks a directory tree, skips files whose content is already
//! stored, splits the rest into overlapping character windows, embeds
//! each window and replaces the file's records in a Qdrant collection.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - embedding (provider trait, OpenAI client)
//!   - store (vector store trait, Qdrant client, provisioning)
//!   - indexer (walking, hashing, chunking, pipeline)
//!   - services (unified service container)
//!
//! - **cli**: clap adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Content-hash dedup, so re-runs only touch changed files
//! - Deterministic record ids, so retries overwrite instead of
//!   duplicating
//! - Per-file failure isolation

pub mod core;

pub mod cli;

pub use core::config::Config;
pub use core::error::{CodevecError, Result};
pub use core::services::Services;
pub use core::types::*;
