//! Collection provisioning.
//!
//! Runs once per indexing run, before any document is touched. Creates
//! the target collection when it is missing and refuses to continue
//! when an existing collection's schema cannot hold the provider's
//! vectors.

use std::sync::Arc;

use super::{CollectionParams, Distance, VectorStore};
use crate::core::error::{CodevecError, Result};

/// Segment count requested for new collections
pub const DEFAULT_SEGMENT_NUMBER: usize = 2;

/// Replication factor for single-node and small deployments
pub const DEFAULT_REPLICATION_FACTOR: u32 = 1;

/// Desired shape of the target collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub dimensions: usize,
    pub distance: Distance,
    pub segment_number: usize,
    pub replication_factor: u32,
}

impl CollectionSpec {
    /// Cosine collection of `dimensions` with default tuning
    pub fn new(name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            dimensions,
            distance: Distance::Cosine,
            segment_number: DEFAULT_SEGMENT_NUMBER,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }

    fn params(&self) -> CollectionParams {
        CollectionParams {
            size: self.dimensions,
            distance: self.distance,
            default_segment_number: Some(self.segment_number),
            replication_factor: Some(self.replication_factor),
        }
    }
}

/// A collection known to exist with the expected schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHandle {
    pub name: String,
    pub dimensions: usize,
    pub distance: Distance,
    /// The collection was created by this call
    pub created: bool,
}

/// Ensures the target collection exists before indexing
pub struct CollectionProvisioner {
    store: Arc<dyn VectorStore>,
}

impl CollectionProvisioner {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Create or validate the collection described by `spec`.
    ///
    /// Idempotent: a second call against the same name creates
    /// nothing. An existing collection with a different vector size or
    /// metric is a configuration error.
    pub async fn ensure(&self, spec: &CollectionSpec) -> Result<CollectionHandle> {
        if spec.name.trim().is_empty() {
            return Err(CodevecError::ConfigError(
                "Collection name must not be empty".to_string(),
            ));
        }
        if spec.dimensions == 0 {
            return Err(CodevecError::ConfigError(
                "Vector dimensions must be non-zero".to_string(),
            ));
        }

        let created = match self.store.collection_info(&spec.name).await? {
            Some(info) => {
                validate_existing(spec, info.size, info.distance)?;
                tracing::info!("Using existing collection '{}'", spec.name);
                false
            }
            None => {
                self.store
                    .create_collection(&spec.name, &spec.params())
                    .await?;
                tracing::info!(
                    "Collection '{}' created ({} dims, {})",
                    spec.name,
                    spec.dimensions,
                    spec.distance
                );
                true
            }
        };

        Ok(CollectionHandle {
            name: spec.name.clone(),
            dimensions: spec.dimensions,
            distance: spec.distance,
            created,
        })
    }
}

fn validate_existing(
    spec: &CollectionSpec,
    size: Option<usize>,
    distance: Option<Distance>,
) -> Result<()> {
    let size = size.ok_or_else(|| {
        CodevecError::ConfigError(format!(
            "Collection '{}' uses named vectors; expected a single {}-dim vector",
            spec.name, spec.dimensions
        ))
    })?;

    if size != spec.dimensions {
        return Err(CodevecError::ConfigError(format!(
            "Collection '{}' stores {}-dim vectors but the embedding model produces {}",
            spec.name, size, spec.dimensions
        )));
    }

    if let Some(distance) = distance {
        if distance != spec.distance {
            return Err(CodevecError::ConfigError(format!(
                "Collection '{}' uses {} distance, expected {}",
                spec.name, distance, spec.distance
            )));
        }
    }

    Ok(())
}
