//! Terminal progress reporting

use crate::cli::output::{colors, print_error, print_warning};
use crate::core::indexer::progress::{ProgressEvent, ProgressSink};

/// Prints pipeline events to stderr
#[derive(Debug, Clone, Copy)]
pub struct CliProgress {
    /// Also print one line per indexed or skipped document
    pub verbose: bool,
    /// Print nothing except failures
    pub quiet: bool,
}

impl ProgressSink for CliProgress {
    fn notify(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { collection, files } => {
                if !self.quiet {
                    eprintln!(
                        "Indexing {} files into {}...",
                        colors::number(&files.to_string()),
                        colors::collection(collection)
                    );
                }
            }
            ProgressEvent::TraversalTruncated { files } => {
                print_warning(&format!(
                    "file limit reached, only the first {files} files will be indexed"
                ));
            }
            ProgressEvent::DocumentIndexed { id, chunks } => {
                if self.verbose && !self.quiet {
                    eprintln!(
                        "  {} {} ({} chunks)",
                        colors::success("indexed"),
                        colors::file_path(id),
                        chunks
                    );
                }
            }
            ProgressEvent::DocumentSkipped { id, reason } => {
                if self.verbose && !self.quiet {
                    eprintln!(
                        "  {} {} ({})",
                        colors::dim("skipped"),
                        colors::file_path(id),
                        reason
                    );
                }
            }
            ProgressEvent::DocumentFailed { id, error } => {
                print_error(&format!("{id}: {error}"));
            }
            ProgressEvent::RunCompleted { .. } => {}
        }
    }
}
