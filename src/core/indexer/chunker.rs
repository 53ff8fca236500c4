//! UTF-8 safe text chunking.
//!
//! Implements character-based chunking that never panics on
//! multi-byte UTF-8 sequences. All window boundaries are computed
//! from `char_indices()`, so every cut falls on a valid character
//! boundary.
//!
//! Windows prefer to end on a paragraph break (`\n\n`), then on a
//! line break (`\n`), and fall back to a hard character cut when
//! neither is available in the back half of the window. Consecutive
//! windows always share exactly `overlap` characters, which means a
//! document can be rebuilt from its chunks by dropping the first
//! `overlap` characters of every chunk after the first.
//!
//! # Example
//!
//! ```
//! use codevec::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(10, 2).unwrap();
//! let windows: Vec<_> = chunker.split("0123456789ABCDEFGHIJ").collect();
//!
//! assert_eq!(windows.len(), 3);
//! assert_eq!(windows[1].text, "89ABCDEFGH");
//! ```

use crate::core::error::{CodevecError, Result};

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap in characters
pub const DEFAULT_OVERLAP: usize = 200;

/// UTF-8 safe text chunker.
///
/// All sizes are measured in **characters**, not bytes.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    /// Maximum number of characters per chunk
    chunk_size: usize,

    /// Number of characters shared by consecutive chunks
    overlap: usize,
}

/// One window produced by [`Chunker::split`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow<'a> {
    /// Sequential index, starting at 0
    pub index: usize,

    /// Window text (borrowed from the source)
    pub text: &'a str,

    /// Byte offset where the window starts
    pub start_offset: usize,

    /// Byte offset where the window ends
    pub end_offset: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// Fails with a configuration error if `chunk_size` is 0 or if
    /// `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(CodevecError::ConfigError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(CodevecError::ConfigError(format!(
                "overlap ({overlap}) must be < chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into overlapping windows.
    ///
    /// The returned iterator is lazy and `Clone`, so the same split
    /// can be replayed without re-reading the text.
    pub fn split<'a>(&self, text: &'a str) -> Windows<'a> {
        Windows {
            text,
            offsets: text.char_indices().map(|(offset, _)| offset).collect(),
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            next_start: 0,
            next_index: 0,
            done: text.is_empty(),
        }
    }

    /// Split `text` and collect owned chunk texts
    pub fn split_to_vec(&self, text: &str) -> Vec<String> {
        self.split(text).map(|w| w.text.to_string()).collect()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Lazy iterator over the windows of one text
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    text: &'a str,
    /// Byte offset of every character
    offsets: Vec<usize>,
    chunk_size: usize,
    overlap: usize,
    /// Character index where the next window starts
    next_start: usize,
    next_index: usize,
    done: bool,
}

impl<'a> Windows<'a> {
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.offsets
            .get(char_idx)
            .copied()
            .unwrap_or(self.text.len())
    }

    fn char_at(&self, char_idx: usize) -> Option<char> {
        let start = *self.offsets.get(char_idx)?;
        self.text[start..].chars().next()
    }

    /// Pick the end (exclusive, in chars) of the window starting at
    /// `start` when the text continues past the hard limit.
    fn window_end(&self, start: usize) -> usize {
        let hard_end = start + self.chunk_size;

        // Break points must leave the window longer than the overlap
        // (so the next window advances) and at least half full.
        let min_end = (start + self.overlap + 1).max(start + self.chunk_size.div_ceil(2));

        let is_newline = |i: usize| self.char_at(i) == Some('\n');

        // Paragraph break: end right after "\n\n"
        if let Some(end) = (min_end..=hard_end)
            .rev()
            .find(|&end| end >= 2 && is_newline(end - 1) && is_newline(end - 2))
        {
            return end;
        }

        // Line break: end right after "\n"
        if let Some(end) = (min_end..=hard_end).rev().find(|&end| is_newline(end - 1)) {
            return end;
        }

        hard_end
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = TextWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let total_chars = self.offsets.len();
        let start = self.next_start;

        let end = if start + self.chunk_size >= total_chars {
            self.done = true;
            total_chars
        } else {
            self.window_end(start)
        };

        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);

        let window = TextWindow {
            index: self.next_index,
            text: &self.text[byte_start..byte_end],
            start_offset: byte_start,
            end_offset: byte_end,
        };

        self.next_index += 1;
        if !self.done {
            // window_end keeps every inner window longer than the overlap
            self.next_start = end - self.overlap;
        }

        Some(window)
    }
}
