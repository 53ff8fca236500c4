//! Unified service container for codevec
//!
//! Wires configuration, the embedding provider and the vector store
//! together and exposes the high-level operations hosts call.

use crate::core::config::Config;
use crate::core::embedding::{EmbeddingProvider, OpenAiEmbedder};
use crate::core::error::{CodevecError, Result};
use crate::core::indexer::progress::ProgressSink;
use crate::core::indexer::{Chunker, FileWalker, IndexingPipeline};
use crate::core::store::{
    CollectionHandle, CollectionProvisioner, CollectionSpec, QdrantStore, VectorStore,
};
use crate::core::types::IndexStats;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Embedding provider shared by every document of a run
    pub embedder: Arc<dyn EmbeddingProvider>,

    /// Vector store client shared by every document of a run
    pub store: Arc<dyn VectorStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Build the real clients from configuration.
    ///
    /// Missing required settings fail here, before any network call.
    pub fn from_config(config: Config) -> Result<Self> {
        config.check_required()?;
        config.validate()?;

        let api_key = config.embedding.api_key.as_deref().unwrap_or_default();
        let embedder = OpenAiEmbedder::new(
            api_key,
            &config.embedding.base_url,
            &config.embedding.model,
            config.embedding.dimensions,
            config.embedding.timeout(),
        )?;

        let url = config.qdrant.url.as_deref().unwrap_or_default();
        let store = QdrantStore::new(url, config.qdrant.api_key.as_deref(), config.qdrant.timeout())?;

        Ok(Self::new(config, Arc::new(embedder), Arc::new(store)))
    }

    /// Assemble services from already-built clients
    pub fn new(
        config: Config,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            embedder,
            store,
            config: Arc::new(config),
        }
    }

    /// Collection shape implied by the configured provider
    pub fn collection_spec(&self) -> CollectionSpec {
        CollectionSpec::new(
            self.config.qdrant.collection.clone(),
            self.embedder.dimensions(),
        )
    }

    /// Create or validate the target collection
    pub async fn provision(&self) -> Result<CollectionHandle> {
        CollectionProvisioner::new(Arc::clone(&self.store))
            .ensure(&self.collection_spec())
            .await
    }

    /// File walker built from the indexing settings
    pub fn create_walker(&self) -> Result<FileWalker> {
        let indexing = &self.config.indexing;
        FileWalker::new(
            indexing.include_patterns.clone(),
            indexing.exclude_patterns.clone(),
            indexing.max_file_size_mb,
            indexing.max_files,
        )
    }

    /// Pipeline targeting `collection` with the configured settings
    pub fn create_pipeline(&self, collection: &CollectionHandle) -> Result<IndexingPipeline> {
        let indexing = &self.config.indexing;
        let chunker = Chunker::new(indexing.chunk_size, indexing.overlap)?;

        Ok(IndexingPipeline::new(
            chunker,
            Arc::clone(&self.embedder),
            Arc::clone(&self.store),
            collection,
        )?
        .with_dedup(indexing.dedup)
        .with_embed_concurrency(self.config.embedding.concurrency)
        .with_author(indexing.author.clone()))
    }

    /// Provision the collection, then index every file under `root`.
    ///
    /// Only configuration and provisioning failures are returned as
    /// errors; per-file failures end up in the stats.
    pub async fn index_directory(
        &self,
        root: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<IndexStats> {
        let root = root.canonicalize().map_err(|e| {
            CodevecError::ConfigError(format!("Cannot open {}: {e}", root.display()))
        })?;

        // Before any network call
        let walker = self.create_walker()?;

        let collection = self.provision().await?;
        let pipeline = self.create_pipeline(&collection)?;

        let listing = walker.collect_files(&root)?;
        tracing::info!(
            "Found {} files under {}",
            listing.files.len(),
            root.display()
        );

        Ok(pipeline.run(&root, &listing, progress, cancel).await)
    }
}
