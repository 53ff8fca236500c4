// Per-document failure isolation and cancellation

use crate::common::fixtures::long_source;
use crate::common::helpers::{TEST_COLLECTION, TEST_DIMENSIONS};
use crate::common::{
    create_test_pipeline, create_test_services, FakeEmbedder, FakeStore, RecordingProgress,
    StoreCall, TestRepo,
};
use codevec::core::error::CodevecError;
use codevec::core::indexer::{Chunker, IndexingPipeline};
use codevec::core::store::{CollectionHandle, Distance};
use codevec::core::types::{Document, DocumentOutcome, FileListing};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn fakes() -> (Arc<FakeStore>, Arc<FakeEmbedder>) {
    (
        Arc::new(FakeStore::with_collection(TEST_COLLECTION, TEST_DIMENSIONS)),
        Arc::new(FakeEmbedder::new(TEST_DIMENSIONS)),
    )
}

#[tokio::test]
async fn test_embedding_failure_writes_nothing() {
    let (store, embedder) = fakes();
    let pipeline = create_test_pipeline(store.clone(), embedder.clone());

    let mut text = long_source(60);
    text.push_str("// POISON\n");
    embedder.fail_on("POISON");

    let err = pipeline
        .index_document(&Document::new("bad.ts", text))
        .await
        .unwrap_err();

    assert!(matches!(err, CodevecError::ProviderRateLimited(_)));
    assert_eq!(store.write_count(), 0);
    assert!(store.chunks_for(TEST_COLLECTION, "bad.ts").is_empty());
}

#[tokio::test]
async fn test_run_continues_after_failed_document() {
    let (store, embedder) = fakes();
    embedder.fail_on("POISON");
    let services = create_test_services(store.clone(), embedder);
    let repo = TestRepo::with_files(&[
        ("a.ts", "const a = 'POISON';"),
        ("b.ts", "const b = 2;"),
    ]);

    let progress = RecordingProgress::default();
    let stats = services
        .index_directory(repo.path(), &progress, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(progress.failures(), vec!["a.ts".to_string()]);
    assert!(store.chunks_for(TEST_COLLECTION, "a.ts").is_empty());
    assert_eq!(store.chunks_for(TEST_COLLECTION, "b.ts").len(), 1);
}

#[tokio::test]
async fn test_failed_dedup_probe_reindexes() {
    let (store, embedder) = fakes();
    let pipeline = create_test_pipeline(store.clone(), embedder.clone());
    let doc = Document::new("b.ts", "export const b = 2;");

    pipeline.index_document(&doc).await.unwrap();
    store.fail_find(true);

    let outcome = pipeline.index_document(&doc).await.unwrap();
    assert_eq!(outcome, DocumentOutcome::Indexed { chunks: 1 });
    assert_eq!(embedder.calls(), 2);
    // Still exactly one record: the rewrite replaced the first one
    assert_eq!(store.chunks_for(TEST_COLLECTION, "b.ts").len(), 1);
}

#[tokio::test]
async fn test_failure_between_delete_and_upsert_recovers() {
    let (store, embedder) = fakes();
    let pipeline = create_test_pipeline(store.clone(), embedder);

    pipeline
        .index_document(&Document::new("c.ts", long_source(60)))
        .await
        .unwrap();

    store.fail_upsert_for("c.ts");
    let changed = Document::new("c.ts", long_source(90));
    assert!(pipeline.index_document(&changed).await.is_err());
    // Old chunks are gone, new ones never landed
    assert!(store.chunks_for(TEST_COLLECTION, "c.ts").is_empty());

    store.clear_failures();
    let outcome = pipeline.index_document(&changed).await.unwrap();
    let DocumentOutcome::Indexed { chunks } = outcome else {
        panic!("expected re-index, got {outcome:?}");
    };

    let stored = store.chunks_for(TEST_COLLECTION, "c.ts");
    assert_eq!(stored.len(), chunks);
    assert!(stored
        .iter()
        .all(|c| c.content_hash == changed.fingerprint.as_str()));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let (store, embedder) = fakes();
    let pipeline = create_test_pipeline(store.clone(), embedder);
    let repo = TestRepo::small();
    let listing = FileListing {
        files: repo.files.clone(),
        truncated: false,
    };

    let cancel = CancellationToken::new();
    cancel.cancel();
    let stats = pipeline
        .run(repo.path(), &listing, &RecordingProgress::default(), &cancel)
        .await;

    assert!(stats.cancelled);
    assert_eq!(stats.files_seen, 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_cancel_mid_run_leaves_no_partial_documents() {
    let store = Arc::new(FakeStore::with_collection(TEST_COLLECTION, TEST_DIMENSIONS));
    let embedder =
        Arc::new(FakeEmbedder::new(TEST_DIMENSIONS).with_delay(Duration::from_millis(40)));
    let pipeline = create_test_pipeline(store.clone(), embedder);

    let files: Vec<(String, String)> = (0..6)
        .map(|i| (format!("f{i}.ts"), long_source(40 + i)))
        .collect();
    let specs: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let repo = TestRepo::with_files(&specs);
    let listing = FileListing {
        files: repo.files.clone(),
        truncated: false,
    };

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        trigger.cancel();
    });

    let stats = pipeline
        .run(repo.path(), &listing, &RecordingProgress::default(), &cancel)
        .await;

    assert!(stats.cancelled);
    assert!(stats.files_indexed < files.len());

    // Each document is either complete or absent
    for (path, _) in &files {
        let chunks = store.chunks_for(TEST_COLLECTION, path);
        if let Some(first) = chunks.first() {
            assert_eq!(chunks.len(), first.total_chunks);
        }
    }
}

#[tokio::test]
async fn test_pipeline_rejects_dimension_mismatch() {
    let (store, _) = fakes();
    let embedder = Arc::new(FakeEmbedder::new(4));
    let handle = CollectionHandle {
        name: TEST_COLLECTION.to_string(),
        dimensions: TEST_DIMENSIONS,
        distance: Distance::Cosine,
        created: false,
    };

    let result = IndexingPipeline::new(Chunker::default(), embedder, store, &handle);
    assert!(result.err().unwrap().is_config_error());
}

#[tokio::test]
async fn test_schema_mismatch_aborts_before_indexing() {
    let store = Arc::new(FakeStore::with_collection(TEST_COLLECTION, 1536));
    let embedder = Arc::new(FakeEmbedder::new(TEST_DIMENSIONS));
    let services = create_test_services(store.clone(), embedder.clone());
    let repo = TestRepo::small();

    let err = services
        .index_directory(repo.path(), &RecordingProgress::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_config_error());
    assert_eq!(embedder.calls(), 0);
    assert!(store
        .calls()
        .iter()
        .all(|c| matches!(c, StoreCall::CollectionInfo(_))));
}
