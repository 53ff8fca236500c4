//! Text extraction.
//!
//! Turns a file path into indexable text. Returning `Ok(None)` means
//! "nothing to index" (binary, non-UTF-8, or blank) and the pipeline
//! skips the file silently.

use std::fs;
use std::path::Path;

use crate::core::error::{CodevecError, Result};

/// Extracts indexable text from a file
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Option<String>>;
}

/// Reads files as UTF-8 plain text.
///
/// Files containing NUL bytes are treated as binary.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<Option<String>> {
        let bytes = fs::read(path).map_err(|e| {
            CodevecError::ExtractionFailed(format!("Failed to read {path:?}: {e}"))
        })?;

        if bytes.contains(&0) {
            tracing::debug!("Skipping binary file: {:?}", path);
            return Ok(None);
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!("Skipping non-UTF-8 file: {:?}", path);
                return Ok(None);
            }
        };

        if text.trim().is_empty() {
            tracing::debug!("Skipping empty file: {:?}", path);
            return Ok(None);
        }

        Ok(Some(text))
    }
}
