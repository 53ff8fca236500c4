//! Core domain logic (transport-agnostic)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **embedding**: Embedding provider clients
//! - **store**: Vector store clients and collection provisioning
//! - **indexer**: File walking, chunking and the indexing pipeline
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

pub use config::Config;
pub use error::{CodevecError, Result};
pub use services::Services;
