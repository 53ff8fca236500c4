//! File system walker with pattern-based filtering.
//!
//! Traverses directory trees in a deterministic (name-sorted) order
//! and filters files using glob patterns. Handles errors gracefully
//! (permission denied, etc.) without crashing. Stops early once the
//! configured file cap is reached and reports the listing as
//! truncated.

use glob::Pattern;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{CodevecError, Result};
use crate::core::types::FileListing;

/// File system walker with pattern-based filtering
pub struct FileWalker {
    /// Patterns to include (e.g., "*.rs", "*.md")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/target/**", "**/.git/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,

    /// Maximum number of files to return
    max_files: usize,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Arguments
    ///
    /// * `include_patterns` - Glob patterns for files to include
    /// * `exclude_patterns` - Glob patterns for files to exclude
    /// * `max_file_size_mb` - Maximum file size in megabytes
    /// * `max_files` - Stop after this many files (0 = unlimited)
    ///
    /// # Returns
    ///
    /// A new `FileWalker` instance or an error if patterns are
    /// invalid
    pub fn new(
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
        max_files: usize,
    ) -> Result<Self> {
        Ok(Self {
            include_patterns: compile_patterns(include_patterns, "include")?,
            exclude_patterns: compile_patterns(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
            max_files: if max_files == 0 {
                usize::MAX
            } else {
                max_files
            },
        })
    }

    /// Collect matching files from a directory
    ///
    /// Traverses the directory tree, applies include/exclude
    /// patterns and filters by file size.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory to start traversal
    ///
    /// # Returns
    ///
    /// The matching paths in discovery order, and whether the file
    /// cap cut the traversal short
    pub fn collect_files(&self, root: &Path) -> Result<FileListing> {
        if !root.is_dir() {
            return Err(CodevecError::ConfigError(format!(
                "Index root {} is not a directory",
                root.display()
            )));
        }

        let mut listing = FileListing::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    // Check file size
                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::debug!(
                                "Skipping large file: {:?} \
                                 ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if !self.matches_patterns(relative_to(path, root)) {
                        continue;
                    }

                    if listing.files.len() >= self.max_files {
                        listing.truncated = true;
                        break;
                    }

                    listing.files.push(path.to_path_buf());
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    // Continue walking despite errors
                }
            }
        }

        Ok(listing)
    }

    /// Determine if a directory entry should be processed
    ///
    /// Filters out hidden directories and excluded patterns.
    /// Never filters the root directory itself.
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        if path == root {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') && entry.file_type().is_dir() {
                return false;
            }
        }

        // Prune whole excluded directory trees early. Patterns see the
        // path below the root so ancestors of the root never match.
        if entry.file_type().is_dir() {
            let relative = relative_to(path, root);
            for pattern in &self.exclude_patterns {
                if pattern.matches_path(relative) {
                    tracing::debug!("Skipping excluded directory: {:?}", path);
                    return false;
                }
            }
        }

        true
    }

    /// Check if a root-relative file path matches the include/exclude
    /// patterns
    fn matches_patterns(&self, path: &Path) -> bool {
        let path_str = match path.to_str() {
            Some(s) => s,
            None => return false,
        };

        // If no include patterns, include all
        let matches_include = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| {
                // Match against both full path and filename
                p.matches(path_str)
                    || path
                        .file_name()
                        .and_then(|f| f.to_str())
                        .map(|f| p.matches(f))
                        .unwrap_or(false)
            });

        if !matches_include {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn compile_patterns(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p).map_err(|e| {
                CodevecError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}"))
            })
        })
        .collect()
}
