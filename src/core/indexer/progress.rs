//! Run progress notifications.
//!
//! The pipeline reports what it is doing through a [`ProgressSink`]
//! instead of return values, so hosts can surface warnings and
//! per-file failures however they like.

use crate::core::types::{IndexStats, SkipReason};

/// Something worth telling the user about
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RunStarted { collection: String, files: usize },
    TraversalTruncated { files: usize },
    DocumentIndexed { id: String, chunks: usize },
    DocumentSkipped { id: String, reason: SkipReason },
    DocumentFailed { id: String, error: String },
    RunCompleted { stats: IndexStats },
}

/// Receives [`ProgressEvent`]s
pub trait ProgressSink: Send + Sync {
    fn notify(&self, event: &ProgressEvent);
}

/// Sink that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { collection, files } => {
                tracing::info!(
                    "Starting embeddings generation for collection '{}' ({} files)",
                    collection,
                    files
                );
            }
            ProgressEvent::TraversalTruncated { files } => {
                tracing::warn!(
                    "File limit reached after {} files; remaining files are skipped",
                    files
                );
            }
            ProgressEvent::DocumentIndexed { id, chunks } => {
                tracing::debug!("Indexed {} ({} chunks)", id, chunks);
            }
            ProgressEvent::DocumentSkipped { id, reason } => {
                tracing::debug!("Skipped {} ({:?})", id, reason);
            }
            ProgressEvent::DocumentFailed { id, error } => {
                tracing::error!("Failed to process {}: {}", id, error);
            }
            ProgressEvent::RunCompleted { stats } => {
                tracing::info!(
                    "Indexing complete: {} indexed, {} unchanged, {} empty, \
                     {} failed, {} chunks in {}ms",
                    stats.files_indexed,
                    stats.files_unchanged,
                    stats.files_empty,
                    stats.files_failed,
                    stats.chunks_upserted,
                    stats.duration_ms
                );
            }
        }
    }
}
