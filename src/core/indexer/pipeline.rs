//! Indexing pipeline orchestration.
//!
//! Runs every discovered file through the same sequence:
//! 1. Hash the content
//! 2. Probe the store for an unchanged copy (dedup)
//! 3. Split into overlapping windows
//! 4. Embed every window
//! 5. Delete the file's previous records
//! 6. Upsert the new records in one durable call
//!
//! A failure in steps 4-6 abandons that file only. Nothing is written
//! before every chunk has an embedding, so a provider failure never
//! leaves a partial set behind. Steps 5 and 6 are separate store
//! calls; a crash between them leaves the file with no records until
//! the next run, which then re-indexes it because the dedup probe finds
//! nothing.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{CodevecError, Result};
use crate::core::indexer::extractor::{PlainTextExtractor, TextExtractor};
use crate::core::indexer::progress::{ProgressEvent, ProgressSink};
use crate::core::indexer::{Chunker, DedupPolicy};
use crate::core::store::{CollectionHandle, VectorStore};
use crate::core::types::{
    ChunkPayload, Document, DocumentOutcome, EmbeddingRecord, FileListing, Filter, IndexStats,
    RecordId, SkipReason,
};

/// Default number of in-flight embedding requests per document
pub const DEFAULT_EMBED_CONCURRENCY: usize = 8;

/// Orchestrates the indexing pipeline
pub struct IndexingPipeline {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    extractor: Arc<dyn TextExtractor>,
    collection: String,
    dedup: DedupPolicy,
    embed_concurrency: usize,
    author: Option<String>,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    ///
    /// # Arguments
    ///
    /// * `chunker` - Window size and overlap
    /// * `embedder` - Shared embedding client
    /// * `store` - Shared vector store client
    /// * `collection` - Provisioned target collection
    ///
    /// # Returns
    ///
    /// A pipeline, or a configuration error when the provider's
    /// vectors do not fit the collection
    pub fn new(
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection: &CollectionHandle,
    ) -> Result<Self> {
        if embedder.dimensions() != collection.dimensions {
            return Err(CodevecError::ConfigError(format!(
                "Model '{}' produces {}-dim vectors but collection '{}' expects {}",
                embedder.model(),
                embedder.dimensions(),
                collection.name,
                collection.dimensions
            )));
        }

        Ok(Self {
            chunker,
            embedder,
            store,
            extractor: Arc::new(PlainTextExtractor),
            collection: collection.name.clone(),
            dedup: DedupPolicy::default(),
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
            author: None,
        })
    }

    /// Use a different dedup policy
    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Limit concurrent embedding requests per document
    pub fn with_embed_concurrency(mut self, concurrency: usize) -> Self {
        self.embed_concurrency = concurrency.max(1);
        self
    }

    /// Use a different text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Attach an author to every document of the run
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
    }

    /// Index every file of `listing`, in order.
    ///
    /// Per-file failures are reported to `progress` and counted; they
    /// never stop the run. Cancellation is honoured between files and
    /// while a file's chunks are being embedded.
    pub async fn run(
        &self,
        root: &Path,
        listing: &FileListing,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> IndexStats {
        let start = Instant::now();
        let mut stats = IndexStats {
            collection: self.collection.clone(),
            truncated: listing.truncated,
            ..IndexStats::default()
        };

        progress.notify(&ProgressEvent::RunStarted {
            collection: self.collection.clone(),
            files: listing.files.len(),
        });
        if listing.truncated {
            progress.notify(&ProgressEvent::TraversalTruncated {
                files: listing.files.len(),
            });
        }

        for (idx, path) in listing.files.iter().enumerate() {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files processed", idx, listing.files.len());
            }

            stats.files_seen += 1;
            let id = crate::core::types::document_id(root, path);

            let text = match self.extractor.extract(path) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    stats.files_empty += 1;
                    continue;
                }
                Err(e) => {
                    stats.files_failed += 1;
                    progress.notify(&ProgressEvent::DocumentFailed {
                        id,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let document = Document::from_path(root, path, text).with_author(self.author.clone());

            match self.process(&document, cancel).await {
                Ok(DocumentOutcome::Indexed { chunks }) => {
                    stats.files_indexed += 1;
                    stats.chunks_upserted += chunks;
                    progress.notify(&ProgressEvent::DocumentIndexed { id, chunks });
                }
                Ok(DocumentOutcome::Skipped { reason }) => {
                    match reason {
                        SkipReason::Unchanged => stats.files_unchanged += 1,
                        SkipReason::Empty => stats.files_empty += 1,
                    }
                    progress.notify(&ProgressEvent::DocumentSkipped { id, reason });
                }
                Err(CodevecError::Cancelled) => {
                    stats.cancelled = true;
                    break;
                }
                Err(e) => {
                    stats.files_failed += 1;
                    progress.notify(&ProgressEvent::DocumentFailed {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        progress.notify(&ProgressEvent::RunCompleted {
            stats: stats.clone(),
        });
        stats
    }

    /// Index a single document
    pub async fn index_document(&self, document: &Document) -> Result<DocumentOutcome> {
        self.process(document, &CancellationToken::new()).await
    }

    async fn process(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<DocumentOutcome> {
        if document.text.is_empty() {
            return Ok(DocumentOutcome::Skipped {
                reason: SkipReason::Empty,
            });
        }

        if self.is_already_indexed(document).await {
            tracing::debug!(
                "Content for {} hasn't changed, skipping reindexing",
                document.id
            );
            return Ok(DocumentOutcome::Skipped {
                reason: SkipReason::Unchanged,
            });
        }

        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CodevecError::Cancelled),
            records = self.embed_document(document) => records?,
        };

        self.replace(document, &records).await?;

        tracing::debug!(
            "Stored {} chunks in '{}' for {}",
            records.len(),
            self.collection,
            document.id
        );
        Ok(DocumentOutcome::Indexed {
            chunks: records.len(),
        })
    }

    /// Run the dedup probe for `document`.
    ///
    /// A failing probe counts as "not indexed" so a possibly changed
    /// file is never skipped because the store hiccupped.
    pub async fn is_already_indexed(&self, document: &Document) -> bool {
        let Some(filter) = self.dedup.probe(document) else {
            return false;
        };

        match self.store.find_by_filter(&self.collection, &filter, 1).await {
            Ok(found) => !found.is_empty(),
            Err(e) => {
                tracing::warn!(
                    "Dedup check for {} failed, re-indexing: {}",
                    document.id,
                    e
                );
                false
            }
        }
    }

    /// Split `document` and embed every window.
    ///
    /// Embedding requests run concurrently; results come back in chunk
    /// order. The first failure aborts the whole document.
    pub async fn embed_document(&self, document: &Document) -> Result<Vec<EmbeddingRecord>> {
        let windows: Vec<_> = self.chunker.split(&document.text).collect();
        let total = windows.len();
        let indexed_at = Utc::now();
        let embedder = &self.embedder;

        let vectors: Vec<Vec<f32>> = stream::iter(windows.iter().map(|w| embedder.embed(w.text)))
            .buffered(self.embed_concurrency)
            .try_collect()
            .await?;

        Ok(windows
            .iter()
            .zip(vectors)
            .map(|(window, vector)| EmbeddingRecord {
                id: RecordId::for_chunk(&document.id, window.index),
                vector,
                payload: ChunkPayload::for_chunk(
                    document,
                    window.text,
                    window.index,
                    total,
                    indexed_at,
                ),
            })
            .collect())
    }

    /// Replace every stored record of `document` with `records`
    pub async fn replace(&self, document: &Document, records: &[EmbeddingRecord]) -> Result<()> {
        self.store
            .delete_by_filter(&self.collection, &Filter::filename(&document.id))
            .await?;
        self.store.upsert(&self.collection, records, true).await
    }
}
