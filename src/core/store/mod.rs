//! Vector store abstraction.
//!
//! A [`VectorStore`] holds named collections of fixed-dimensionality
//! vectors with JSON payloads. The indexer only needs a handful of
//! operations: schema lookup and creation, filtered lookup, filtered
//! delete, and upsert by record id.
//!
//! # Architecture
//!
//! - **VectorStore**: async trait consumed by the pipeline
//! - **QdrantStore**: Qdrant REST implementation
//! - **CollectionProvisioner**: creates/validates the target collection

mod provisioner;
pub mod qdrant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::Result;
use crate::core::types::{EmbeddingRecord, Filter, StoredRecord};

pub use provisioner::{CollectionHandle, CollectionProvisioner, CollectionSpec};
pub use qdrant::QdrantStore;

/// Vector distance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Dot,
    Euclid,
    Manhattan,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distance::Cosine => "Cosine",
            Distance::Dot => "Dot",
            Distance::Euclid => "Euclid",
            Distance::Manhattan => "Manhattan",
        };
        f.write_str(name)
    }
}

/// Schema of an existing collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    /// Vector length; `None` when the collection uses named vectors
    pub size: Option<usize>,
    pub distance: Option<Distance>,
}

/// Parameters used when creating a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionParams {
    pub size: usize,
    pub distance: Distance,
    /// Target number of storage segments
    pub default_segment_number: Option<usize>,
    pub replication_factor: Option<u32>,
}

impl CollectionParams {
    pub fn new(size: usize, distance: Distance) -> Self {
        Self {
            size,
            distance,
            default_segment_number: None,
            replication_factor: None,
        }
    }
}

/// Operations the indexer needs from a vector database
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Look up a collection by name
    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>>;

    /// Create a collection; fails if the store rejects the request
    async fn create_collection(&self, name: &str, params: &CollectionParams) -> Result<()>;

    /// Create `name` unless it already exists.
    ///
    /// Existing collections are left untouched even if their schema
    /// differs; use [`CollectionProvisioner`] for validation.
    async fn ensure_collection(&self, name: &str, size: usize, distance: Distance) -> Result<()> {
        if self.collection_info(name).await?.is_none() {
            self.create_collection(name, &CollectionParams::new(size, distance))
                .await?;
        }
        Ok(())
    }

    /// Return up to `limit` records matching `filter`
    async fn find_by_filter(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredRecord>>;

    /// Remove every record matching `filter` (no-op if none match)
    async fn delete_by_filter(&self, collection: &str, filter: &Filter) -> Result<()>;

    /// Insert or overwrite `records` by id.
    ///
    /// With `wait` set the call returns only after the store has
    /// persisted the write.
    async fn upsert(&self, collection: &str, records: &[EmbeddingRecord], wait: bool)
        -> Result<()>;
}
