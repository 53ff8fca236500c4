//! Core data types for codevec.
//!
//! This module defines the data structures that flow through the
//! indexing pipeline: documents, chunk payloads, embedding records,
//! store filters and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::core::indexer::hasher::{ContentHasher, Fingerprint};
use crate::core::indexer::language::language_for_path;

/// Payload key holding the document identity
pub const FILENAME_KEY: &str = "filename";

/// Payload key holding the content fingerprint
pub const FINGERPRINT_KEY: &str = "contentHash";

/// One source file's extracted text plus its identity
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable relative path, forward slashes, no leading slash
    pub id: String,

    /// Extracted text content
    pub text: String,

    /// SHA-256 of the raw content
    pub fingerprint: Fingerprint,

    /// Language tag derived from the file extension
    pub language: String,

    /// Author, when the caller knows one
    pub author: Option<String>,
}

impl Document {
    /// Create a document, fingerprinting its content
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        let text = text.into();
        let fingerprint = ContentHasher::hash(text.as_bytes());
        let language = language_for_path(Path::new(&id)).to_string();

        Self {
            id,
            text,
            fingerprint,
            language,
            author: None,
        }
    }

    /// Create a document for a file below `root`.
    ///
    /// The identity is the path relative to `root`; files outside
    /// `root` keep their full path as identity.
    pub fn from_path(root: &Path, path: &Path, text: impl Into<String>) -> Self {
        Self::new(document_id(root, path), text)
    }

    /// Attach an author
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// Override the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Compute the stable identity of `path` relative to `root`.
///
/// Paths outside `root` keep their full form so they can never collide
/// with a file below it.
pub fn document_id(root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return path.to_string_lossy().into_owned();
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Payload persisted next to each vector.
///
/// Key names are camelCase to stay readable by other tools that
/// query the same collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPayload {
    /// Chunk text
    pub text: String,

    /// 0-based position within the document
    pub chunk_index: usize,

    /// Number of chunks the document was split into
    pub total_chunks: usize,

    /// Fingerprint of the whole document
    pub content_hash: String,

    /// Milliseconds since the epoch when the chunk was indexed
    pub last_updated: i64,

    /// Language tag
    pub language: String,

    /// Document identity
    pub filename: String,

    /// Same as `filename`; kept for readers that expect it
    pub file_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ChunkPayload {
    /// Build the payload for chunk `index` of `total` of a document
    pub fn for_chunk(
        document: &Document,
        text: &str,
        index: usize,
        total: usize,
        indexed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.to_string(),
            chunk_index: index,
            total_chunks: total,
            content_hash: document.fingerprint.to_string(),
            last_updated: indexed_at.timestamp_millis(),
            language: document.language.clone(),
            filename: document.id.clone(),
            file_path: document.id.clone(),
            author: document.author.clone(),
        }
    }
}

/// Deterministic record identity.
///
/// Derived from `document id + "#" + chunk index` so re-indexing the
/// same chunk position overwrites instead of duplicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    /// Id for chunk `index` of document `document_id`
    pub fn for_chunk(document_id: &str, index: usize) -> Self {
        let digest = ContentHasher::digest(format!("{document_id}#{index}").as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(uuid::Uuid::from_bytes(bytes))
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One persisted unit: vector plus chunk payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRecord {
    pub id: RecordId,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// A record as returned by a store query
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredRecord {
    /// Point id as reported by the store
    pub id: Value,

    /// Raw payload
    #[serde(default)]
    pub payload: Value,
}

impl StoredRecord {
    /// Decode the payload, if it was written by codevec
    pub fn chunk_payload(&self) -> Option<ChunkPayload> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Exact-match condition on a payload key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub matches: MatchValue,
}

/// Value side of a [`FieldCondition`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchValue {
    pub value: String,
}

impl FieldCondition {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matches: MatchValue {
                value: value.into(),
            },
        }
    }

    fn matches_payload(&self, payload: &Value) -> bool {
        payload
            .get(&self.key)
            .and_then(Value::as_str)
            .map(|v| v == self.matches.value)
            .unwrap_or(false)
    }
}

/// Payload filter in the store's boolean form.
///
/// All `must` conditions have to hold; when `should` is non-empty at
/// least one of them has to hold as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<FieldCondition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<FieldCondition>,
}

impl Filter {
    /// Records belonging to document `id`
    pub fn filename(id: &str) -> Self {
        Self::all(vec![FieldCondition::new(FILENAME_KEY, id)])
    }

    /// Records carrying fingerprint `fingerprint`
    pub fn fingerprint(fingerprint: &Fingerprint) -> Self {
        Self::all(vec![FieldCondition::new(
            FINGERPRINT_KEY,
            fingerprint.as_str(),
        )])
    }

    /// Conjunction of conditions
    pub fn all(conditions: Vec<FieldCondition>) -> Self {
        Self {
            must: conditions,
            should: Vec::new(),
        }
    }

    /// Disjunction of conditions
    pub fn any(conditions: Vec<FieldCondition>) -> Self {
        Self {
            must: Vec::new(),
            should: conditions,
        }
    }

    /// Evaluate the filter against a JSON payload
    pub fn matches(&self, payload: &Value) -> bool {
        let must_ok = self.must.iter().all(|c| c.matches_payload(payload));
        let should_ok =
            self.should.is_empty() || self.should.iter().any(|c| c.matches_payload(payload));
        must_ok && should_ok
    }
}

/// Ordered list of files produced by traversal
#[derive(Debug, Clone, Default)]
pub struct FileListing {
    /// Absolute paths in discovery order
    pub files: Vec<PathBuf>,

    /// Traversal stopped early because of the file cap
    pub truncated: bool,
}

/// Why a document was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The dedup probe found matching records
    Unchanged,
    /// The document had no text
    Empty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unchanged => f.write_str("unchanged"),
            SkipReason::Empty => f.write_str("empty"),
        }
    }
}

/// Result of running the pipeline on one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Skipped { reason: SkipReason },
    Indexed { chunks: usize },
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files handed to the pipeline
    pub files_seen: usize,

    /// Files whose chunks were (re)written
    pub files_indexed: usize,

    /// Files skipped by the dedup probe
    pub files_unchanged: usize,

    /// Files with no extractable text
    pub files_empty: usize,

    /// Files abandoned after a provider or store error
    pub files_failed: usize,

    /// Records upserted
    pub chunks_upserted: usize,

    /// Traversal hit the file cap
    pub truncated: bool,

    /// Run stopped before the last file
    pub cancelled: bool,

    /// Run duration in milliseconds
    pub duration_ms: u64,

    /// Target collection
    pub collection: String,
}
