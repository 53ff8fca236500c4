//! Document indexing module.
//!
//! Turns a directory of files into embedded, de-duplicated records.
//! Key pieces:
//!
//! - UTF-8 safe character-based chunking with overlap
//! - Content fingerprints for change detection
//! - File system walking with pattern matching
//! - Indexing pipeline orchestration
//!
//! # Safety
//!
//! The chunker slices by character index via `char_indices()`, so
//! windows never split a multi-byte sequence.

pub mod chunker;
pub mod dedup;
pub mod extractor;
pub mod hasher;
pub mod language;
pub mod pipeline;
pub mod progress;
pub mod walker;

pub use chunker::{Chunker, TextWindow};
pub use dedup::DedupPolicy;
pub use extractor::{PlainTextExtractor, TextExtractor};
pub use hasher::{ContentHasher, Fingerprint};
pub use pipeline::IndexingPipeline;
pub use progress::{ProgressEvent, ProgressSink, TracingProgress};
pub use walker::FileWalker;
