// In-memory collaborators for pipeline tests

use async_trait::async_trait;
use codevec::core::embedding::EmbeddingProvider;
use codevec::core::error::{CodevecError, Result};
use codevec::core::indexer::progress::{ProgressEvent, ProgressSink};
use codevec::core::store::{CollectionInfo, CollectionParams, VectorStore};
use codevec::core::types::{ChunkPayload, EmbeddingRecord, Filter, StoredRecord};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Store operation, in call order
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    CollectionInfo(String),
    CreateCollection(String, usize),
    Find(Filter),
    Delete(Filter),
    Upsert { count: usize, wait: bool },
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, CollectionInfo>,
    // collection -> point id -> (vector, payload)
    points: HashMap<String, BTreeMap<String, (Vec<f32>, Value)>>,
    calls: Vec<StoreCall>,
}

/// Vector store kept in memory
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
    fail_find: Mutex<bool>,
    fail_upsert_for: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `name` already provisioned
    pub fn with_collection(name: &str, size: usize) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().collections.insert(
            name.to_string(),
            CollectionInfo {
                name: name.to_string(),
                size: Some(size),
                distance: Some(codevec::core::store::Distance::Cosine),
            },
        );
        store
    }

    /// Make every dedup probe fail
    pub fn fail_find(&self, fail: bool) {
        *self.fail_find.lock().unwrap() = fail;
    }

    /// Make upserts carrying chunks of `filename` fail
    pub fn fail_upsert_for(&self, filename: &str) {
        self.fail_upsert_for
            .lock()
            .unwrap()
            .insert(filename.to_string());
    }

    /// Undo `fail_find` and `fail_upsert_for`
    pub fn clear_failures(&self) {
        *self.fail_find.lock().unwrap() = false;
        self.fail_upsert_for.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Number of delete and upsert calls
    pub fn write_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Delete(_) | StoreCall::Upsert { .. }))
            .count()
    }

    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .collections
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn point_count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .points
            .get(collection)
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// Payloads of `filename`, ordered by chunk index
    pub fn chunks_for(&self, collection: &str, filename: &str) -> Vec<ChunkPayload> {
        let state = self.state.lock().unwrap();
        let mut chunks: Vec<ChunkPayload> = state
            .points
            .get(collection)
            .map(|points| {
                points
                    .values()
                    .filter_map(|(_, payload)| serde_json::from_value(payload.clone()).ok())
                    .filter(|p: &ChunkPayload| p.filename == filename)
                    .collect()
            })
            .unwrap_or_default();
        chunks.sort_by_key(|c| c.chunk_index);
        chunks
    }

    /// Vectors and payloads of `filename`, ordered by chunk index
    pub fn records_for(&self, collection: &str, filename: &str) -> Vec<(Vec<f32>, ChunkPayload)> {
        let state = self.state.lock().unwrap();
        let mut records: Vec<(Vec<f32>, ChunkPayload)> = state
            .points
            .get(collection)
            .map(|points| {
                points
                    .values()
                    .filter_map(|(vector, payload)| {
                        serde_json::from_value::<ChunkPayload>(payload.clone())
                            .ok()
                            .map(|p| (vector.clone(), p))
                    })
                    .filter(|(_, p)| p.filename == filename)
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|(_, p)| p.chunk_index);
        records
    }

    /// Point ids stored for `filename`
    pub fn ids_for(&self, collection: &str, filename: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .points
            .get(collection)
            .map(|points| {
                points
                    .iter()
                    .filter(|(_, (_, payload))| {
                        payload.get("filename").and_then(Value::as_str) == Some(filename)
                    })
                    .map(|(id, _)| id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::CollectionInfo(name.to_string()));
        Ok(state.collections.get(name).cloned())
    }

    async fn create_collection(&self, name: &str, params: &CollectionParams) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(StoreCall::CreateCollection(name.to_string(), params.size));
        if state.collections.contains_key(name) {
            return Err(CodevecError::StoreError(format!(
                "collection '{name}' already exists"
            )));
        }
        state.collections.insert(
            name.to_string(),
            CollectionInfo {
                name: name.to_string(),
                size: Some(params.size),
                distance: Some(params.distance),
            },
        );
        Ok(())
    }

    async fn find_by_filter(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Find(filter.clone()));
        if *self.fail_find.lock().unwrap() {
            return Err(CodevecError::StoreError("scroll timed out".to_string()));
        }

        Ok(state
            .points
            .get(collection)
            .map(|points| {
                points
                    .iter()
                    .filter(|(_, (_, payload))| filter.matches(payload))
                    .take(limit)
                    .map(|(id, (_, payload))| StoredRecord {
                        id: Value::String(id.clone()),
                        payload: payload.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_by_filter(&self, collection: &str, filter: &Filter) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Delete(filter.clone()));
        if let Some(points) = state.points.get_mut(collection) {
            points.retain(|_, (_, payload)| !filter.matches(payload));
        }
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        records: &[EmbeddingRecord],
        wait: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Upsert {
            count: records.len(),
            wait,
        });

        let failing = self.fail_upsert_for.lock().unwrap();
        if records
            .iter()
            .any(|r| failing.contains(&r.payload.filename))
        {
            return Err(CodevecError::StoreError("upsert rejected".to_string()));
        }

        let points = state.points.entry(collection.to_string()).or_default();
        for record in records {
            let payload = serde_json::to_value(&record.payload)?;
            points.insert(record.id.to_string(), (record.vector.clone(), payload));
        }
        Ok(())
    }
}

/// Deterministic embedder: vector derived from text length
#[allow(dead_code)]
pub struct FakeEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
    fail_on: Mutex<Option<String>>,
    delay: Option<Duration>,
    // (step, calls): call i sleeps step * (calls - i)
    staggered: Option<(Duration, usize)>,
    finished: Mutex<Vec<usize>>,
}

#[allow(dead_code)]
impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            fail_on: Mutex::new(None),
            delay: None,
            staggered: None,
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Make earlier calls slower than later ones so that, with
    /// concurrent requests, later calls finish first
    pub fn with_staggered_delay(mut self, step: Duration, calls: usize) -> Self {
        self.staggered = Some((step, calls));
        self
    }

    /// Call indices in the order their embeddings completed
    pub fn finished_order(&self) -> Vec<usize> {
        self.finished.lock().unwrap().clone()
    }

    /// Vector returned for `text`
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        vector[0] = text.chars().count() as f32;
        if self.dimensions > 1 {
            let checksum = text.bytes().fold(0u32, |acc, b| {
                acc.wrapping_mul(31).wrapping_add(u32::from(b)) % 10_007
            });
            vector[1] = checksum as f32;
        }
        vector
    }

    /// Sleep before every embedding
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail any chunk whose text contains `needle`
    pub fn fail_on(&self, needle: &str) {
        *self.fail_on.lock().unwrap() = Some(needle.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "fake-embedding"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((step, calls)) = self.staggered {
            let remaining = calls.saturating_sub(call) as u32;
            tokio::time::sleep(step * remaining).await;
        }

        let failing = self.fail_on.lock().unwrap().clone();
        if let Some(needle) = failing {
            if text.contains(&needle) {
                return Err(CodevecError::ProviderRateLimited(
                    "429 Too Many Requests".to_string(),
                ));
            }
        }

        self.finished.lock().unwrap().push(call);
        Ok(self.vector_for(text))
    }
}

/// Progress sink that keeps every event
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

#[allow(dead_code)]
impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::DocumentFailed { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn truncation_warnings(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::TraversalTruncated { .. }))
            .count()
    }
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
