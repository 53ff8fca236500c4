//! OpenAI-compatible embedding client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::core::error::{CodevecError, Result};

/// Async embeddings client that talks to OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// Builds a new OpenAI embeddings client.
    ///
    /// # Arguments
    /// * `api_key` - Bearer token (usually from `OPENAI_API_KEY`)
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `model` - Embedding model, e.g. `text-embedding-ada-002`
    /// * `dimensions` - Expected vector length for `model`
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CodevecError::ConfigError(
                "missing embedding API key".to_string(),
            ));
        }
        if model.trim().is_empty() {
            return Err(CodevecError::ConfigError(
                "missing embedding model name".to_string(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CodevecError::ConfigError(format!(
                "embedding base URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| CodevecError::ConfigError("invalid embedding API key".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                CodevecError::ConfigError(format!("failed to build embedding HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimensions,
        })
    }

    /// Full embeddings endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CodevecError::ProviderError(format!("embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(classify_failure(status, body));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            CodevecError::ProviderError(format!("failed to parse embedding response: {e}"))
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .map(|entry| entry.embedding)
            .ok_or_else(|| {
                CodevecError::ProviderError("embedding response contained no data".to_string())
            })?;

        if embedding.len() != self.dimensions {
            return Err(CodevecError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }
}

fn classify_failure(status: StatusCode, body: String) -> CodevecError {
    let detail = format!("{status}: {body}");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CodevecError::ProviderUnauthorized(detail)
        }
        StatusCode::TOO_MANY_REQUESTS => CodevecError::ProviderRateLimited(detail),
        _ => CodevecError::ProviderError(detail),
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}
