//! Configuration management for codevec.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults for everything except the
//! endpoints and credentials.

use crate::core::error::{CodevecError, Result};
use crate::core::indexer::chunker::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::core::indexer::DedupPolicy;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Placeholder printed instead of secrets
const REDACTED: &str = "<redacted>";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
}

/// Vector store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QdrantConfig {
    /// Cluster URL, e.g. `http://localhost:6333`
    #[serde(default)]
    pub url: Option<String>,

    /// Optional `api-key` header value
    #[serde(default)]
    pub api_key: Option<String>,

    /// Target collection
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Vector length produced by `model`
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,

    /// In-flight embedding requests per document
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Stop discovering files after this many (0 = unlimited)
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub dedup: DedupPolicy,

    /// Stored on every chunk when set
    #[serde(default)]
    pub author: Option<String>,
}

fn default_collection() -> String {
    "code_embeddings".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_dimensions() -> usize {
    crate::core::embedding::ADA_002_DIMENSIONS
}

fn default_concurrency() -> usize {
    crate::core::indexer::pipeline::DEFAULT_EMBED_CONCURRENCY
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_overlap() -> usize {
    DEFAULT_OVERLAP
}

fn default_max_file_size() -> usize {
    10
}

fn default_max_files() -> usize {
    5000
}

fn default_include_patterns() -> Vec<String> {
    [
        "*.ts", "*.tsx", "*.js", "*.jsx", "*.mjs", "*.cjs", "*.rs", "*.py", "*.go", "*.java",
        "*.kt", "*.c", "*.h", "*.cpp", "*.hpp", "*.cs", "*.rb", "*.php", "*.swift", "*.md",
        "*.toml", "*.json", "*.yaml", "*.yml", "*.txt",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    [
        // Build artifacts and dependencies
        "**/node_modules/**",
        "**/target/**",
        "**/vendor/**",
        "**/.git/**",
        "**/build/**",
        "**/out/**",
        "**/__pycache__/**",
        "**/dist/**",
        "**/.next/**",
        // Generated
        "**/*.min.js",
        "**/*.map",
        "**/package-lock.json",
        "**/yarn.lock",
        "**/Cargo.lock",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            collection: default_collection(),
            timeout_sec: default_timeout(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            dimensions: default_dimensions(),
            timeout_sec: default_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            max_file_size_mb: default_max_file_size(),
            max_files: default_max_files(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            dedup: DedupPolicy::default(),
            author: None,
        }
    }
}

impl QdrantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CodevecError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File lookup order:
    /// 1. `CODEVEC_CONFIG` env var
    /// 2. XDG config file (~/.config/codevec/config.toml)
    /// 3. ./codevec.toml
    /// 4. Defaults
    ///
    /// Required settings are not checked here; callers that need
    /// them use [`Config::check_required`] after applying their own
    /// overrides.
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("CODEVEC_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("codevec.toml").exists() {
                Self::from_file("codevec.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Vector store
        if let Ok(url) = env::var("CODEVEC_QDRANT_URL") {
            self.qdrant.url = Some(url);
        }
        if let Some(key) = first_env(&["CODEVEC_QDRANT_API_KEY", "QDRANT_API_KEY"]) {
            self.qdrant.api_key = Some(key);
        }
        if let Ok(collection) = env::var("CODEVEC_COLLECTION") {
            self.qdrant.collection = collection;
        }

        // Embedding provider
        if let Some(key) = first_env(&["CODEVEC_OPENAI_API_KEY", "OPENAI_API_KEY"]) {
            self.embedding.api_key = Some(key);
        }
        if let Ok(base_url) = env::var("CODEVEC_EMBEDDING_BASE_URL") {
            self.embedding.base_url = base_url;
        }
        if let Ok(model) = env::var("CODEVEC_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(dims) = env::var("CODEVEC_EMBEDDING_DIMENSIONS") {
            if let Ok(d) = dims.parse() {
                self.embedding.dimensions = d;
            }
        }

        // Indexing
        if let Ok(chunk_size) = env::var("CODEVEC_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("CODEVEC_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.overlap = o;
            }
        }
        if let Ok(max_size) = env::var("CODEVEC_MAX_FILE_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.indexing.max_file_size_mb = size;
            }
        }
        if let Ok(max_files) = env::var("CODEVEC_MAX_FILES") {
            if let Ok(n) = max_files.parse() {
                self.indexing.max_files = n;
            }
        }
        if let Ok(dedup) = env::var("CODEVEC_DEDUP") {
            match dedup.parse() {
                Ok(policy) => self.indexing.dedup = policy,
                Err(e) => tracing::warn!("Ignoring CODEVEC_DEDUP: {}", e),
            }
        }
        if let Ok(author) = env::var("CODEVEC_AUTHOR") {
            self.indexing.author = Some(author);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(CodevecError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(CodevecError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(CodevecError::ConfigError(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        if self.embedding.concurrency == 0 {
            return Err(CodevecError::ConfigError(
                "Embedding concurrency must be non-zero".to_string(),
            ));
        }

        if self.qdrant.timeout_sec == 0 || self.embedding.timeout_sec == 0 {
            return Err(CodevecError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Fail when any setting needed to reach the store or provider is
    /// missing. Every missing field is listed in one error.
    pub fn check_required(&self) -> Result<()> {
        let mut missing = Vec::new();

        if is_blank(self.qdrant.url.as_deref()) {
            missing.push("qdrant.url (CODEVEC_QDRANT_URL)");
        }
        if self.qdrant.collection.trim().is_empty() {
            missing.push("qdrant.collection (CODEVEC_COLLECTION)");
        }
        if is_blank(self.embedding.api_key.as_deref()) {
            missing.push("embedding.api_key (OPENAI_API_KEY)");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CodevecError::ConfigError(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// Copy of this configuration with every secret replaced
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.qdrant.api_key.is_some() {
            copy.qdrant.api_key = Some(REDACTED.to_string());
        }
        if copy.embedding.api_key.is_some() {
            copy.embedding.api_key = Some(REDACTED.to_string());
        }
        copy
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Qdrant URL: {}",
            self.qdrant.url.as_deref().unwrap_or("<unset>")
        );
        tracing::info!(
            "  Qdrant API key: {}",
            secret_state(self.qdrant.api_key.as_deref())
        );
        tracing::info!("  Collection: {}", self.qdrant.collection);
        tracing::info!(
            "  Embedding model: {} ({} dims)",
            self.embedding.model,
            self.embedding.dimensions
        );
        tracing::info!("  Embedding endpoint: {}", self.embedding.base_url);
        tracing::info!(
            "  Embedding API key: {}",
            secret_state(self.embedding.api_key.as_deref())
        );
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!("  Max files: {}", self.indexing.max_files);
        tracing::info!("  Dedup policy: {}", self.indexing.dedup);
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn secret_state(value: Option<&str>) -> &'static str {
    if is_blank(value) {
        "<unset>"
    } else {
        REDACTED
    }
}
