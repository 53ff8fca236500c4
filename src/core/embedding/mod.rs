//! Embedding providers.
//!
//! An [`EmbeddingProvider`] turns one chunk of text into one vector of
//! a fixed, provider-defined length. Providers never retry; transient
//! failures are reported to the caller as errors.

pub mod openai;

use async_trait::async_trait;

use crate::core::error::Result;

pub use openai::OpenAiEmbedder;

/// Vector length produced by `text-embedding-ada-002`
pub const ADA_002_DIMENSIONS: usize = 1536;

/// Text-in, vector-out embedding capability
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Length of every vector returned by [`embed`](Self::embed)
    fn dimensions(&self) -> usize;

    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Embed a single chunk of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
