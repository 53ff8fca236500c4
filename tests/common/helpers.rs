// Test helper functions

use super::fakes::{FakeEmbedder, FakeStore, RecordingProgress};
use codevec::core::config::Config;
use codevec::core::indexer::{Chunker, IndexingPipeline};
use codevec::core::services::Services;
use codevec::core::store::{CollectionHandle, Distance};
use codevec::core::types::IndexStats;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Collection used by pipeline tests
#[allow(dead_code)]
pub const TEST_COLLECTION: &str = "code";

/// Vector length used by pipeline tests
#[allow(dead_code)]
pub const TEST_DIMENSIONS: usize = 8;

/// Services over in-memory fakes, indexing every file
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(store: Arc<FakeStore>, embedder: Arc<FakeEmbedder>) -> Services {
    let mut config = Config::default();
    config.qdrant.url = Some("http://localhost:6333".to_string());
    config.qdrant.collection = TEST_COLLECTION.to_string();
    config.embedding.api_key = Some("sk-test".to_string());
    config.indexing.include_patterns = vec!["**/*".to_string()];

    Services::new(config, embedder, store)
}

/// Pipeline over in-memory fakes with default chunking
#[allow(dead_code)] // Used in integration tests
pub fn create_test_pipeline(store: Arc<FakeStore>, embedder: Arc<FakeEmbedder>) -> IndexingPipeline {
    let handle = CollectionHandle {
        name: TEST_COLLECTION.to_string(),
        dimensions: TEST_DIMENSIONS,
        distance: Distance::Cosine,
        created: false,
    };
    IndexingPipeline::new(Chunker::default(), embedder, store, &handle)
        .expect("Pipeline creation should succeed")
}

/// Index `repo_path` through the services and return the stats
#[allow(dead_code)] // Used in integration tests
pub async fn index_test_repository(services: &Services, repo_path: &Path) -> IndexStats {
    let progress = RecordingProgress::default();
    services
        .index_directory(repo_path, &progress, &CancellationToken::new())
        .await
        .expect("Indexing should succeed")
}
