// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Synthetic source tree in a temporary directory
#[allow(dead_code)] // Used in integration tests
pub struct TestRepo {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestRepo {
    /// Small TypeScript project (3 files)
    #[allow(dead_code)] // Used in integration tests
    pub fn small() -> Self {
        Self::with_files(&[
            ("a.ts", "export const a = 1;\n"),
            ("src/b.ts", "export function b(): number {\n  return 2;\n}\n"),
            ("src/c.ts", "import { a } from '../a';\nexport const c = a + 1;\n"),
        ])
    }

    /// Create with custom files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            std::fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// Overwrite (or create) a file
    #[allow(dead_code)] // Used in integration tests
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.dir.path().join(path);
        std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        std::fs::write(full_path, content).unwrap();
    }

    /// Get path to the repository
    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Text long enough to produce several 1000-char windows
#[allow(dead_code)] // Used in integration tests
pub fn long_source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("export const value{i:04} = {i}; // line {i}\n"))
        .collect()
}
