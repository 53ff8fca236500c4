//! Qdrant REST client.
//!
//! Talks to the Qdrant HTTP API directly with `reqwest`. Every call is
//! scoped to a named collection and authenticated with the optional
//! `api-key` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{CollectionInfo, CollectionParams, Distance, VectorStore};
use crate::core::error::{CodevecError, Result};
use crate::core::types::{EmbeddingRecord, Filter, StoredRecord};

/// Async Qdrant client
#[derive(Clone)]
pub struct QdrantStore {
    client: Client,
    base_url: Url,
}

impl QdrantStore {
    /// Builds a new Qdrant client.
    ///
    /// # Arguments
    /// * `url` - Cluster URL, e.g. `http://localhost:6333`
    /// * `api_key` - Value for the `api-key` header, if the cluster
    ///   requires one
    pub fn new(url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CodevecError::ConfigError(format!(
                "Qdrant URL must be an http(s) URL, got '{url}'"
            )));
        }

        let base_url = Url::parse(url)
            .map_err(|e| CodevecError::ConfigError(format!("Invalid Qdrant URL '{url}': {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key)
                .map_err(|_| CodevecError::ConfigError("invalid Qdrant API key".to_string()))?;
            value.set_sensitive(true);
            headers.insert("api-key", value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                CodevecError::ConfigError(format!("failed to build Qdrant HTTP client: {e}"))
            })?;

        Ok(Self { client, base_url })
    }

    /// Build a request to `segments` below the base URL. Each segment is
    /// percent-encoded, so collection names cannot alter the path.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CodevecError::ConfigError(format!("Qdrant URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(self.client.request(method, url))
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        builder
            .send()
            .await
            .map_err(|e| CodevecError::StoreError(format!("{what} failed: {e}")))
    }

    async fn expect_success(&self, response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        Err(CodevecError::StoreError(format!(
            "{what} failed ({status}): {body}"
        )))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>> {
        let what = format!("get collection '{name}'");
        let response = self
            .send(self.request(Method::GET, &["collections", name])?, &what)
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.expect_success(response, &what).await?;

        let body: ApiResponse<CollectionDescription> = response.json().await.map_err(|e| {
            CodevecError::StoreError(format!("failed to parse collection info: {e}"))
        })?;

        let (size, distance) = match body.result.config.params.vectors {
            Some(VectorsConfig::Single(params)) => (Some(params.size), Some(params.distance)),
            Some(VectorsConfig::Named(_)) | None => (None, None),
        };

        Ok(Some(CollectionInfo {
            name: name.to_string(),
            size,
            distance,
        }))
    }

    async fn create_collection(&self, name: &str, params: &CollectionParams) -> Result<()> {
        let mut body = json!({
            "vectors": {
                "size": params.size,
                "distance": params.distance,
            }
        });
        if let Some(segments) = params.default_segment_number {
            body["optimizers_config"] = json!({ "default_segment_number": segments });
        }
        if let Some(factor) = params.replication_factor {
            body["replication_factor"] = json!(factor);
        }

        let what = format!("create collection '{name}'");
        let response = self
            .send(
                self.request(Method::PUT, &["collections", name])?.json(&body),
                &what,
            )
            .await?;
        self.expect_success(response, &what).await?;

        tracing::debug!(
            "PUT collection '{}' ({} dims, {})",
            name,
            params.size,
            params.distance
        );
        Ok(())
    }

    async fn find_by_filter(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredRecord>> {
        let body = ScrollRequest {
            filter,
            limit,
            with_payload: true,
            with_vector: false,
        };

        let what = format!("scroll '{collection}'");
        let response = self
            .send(
                self.request(Method::POST, &["collections", collection, "points", "scroll"])?
                    .json(&body),
                &what,
            )
            .await?;
        let response = self.expect_success(response, &what).await?;

        let body: ApiResponse<ScrollResult> = response
            .json()
            .await
            .map_err(|e| CodevecError::StoreError(format!("failed to parse scroll result: {e}")))?;

        Ok(body.result.points)
    }

    async fn delete_by_filter(&self, collection: &str, filter: &Filter) -> Result<()> {
        let what = format!("delete from '{collection}'");
        let response = self
            .send(
                self.request(Method::POST, &["collections", collection, "points", "delete"])?
                    .query(&[("wait", true)])
                    .json(&json!({ "filter": filter })),
                &what,
            )
            .await?;
        self.expect_success(response, &what).await?;
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        records: &[EmbeddingRecord],
        wait: bool,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let what = format!("upsert into '{collection}'");
        let response = self
            .send(
                self.request(Method::PUT, &["collections", collection, "points"])?
                    .query(&[("wait", wait)])
                    .json(&json!({ "points": records })),
                &what,
            )
            .await?;
        self.expect_success(response, &what).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    config: CollectionConfig,
}

#[derive(Debug, Deserialize)]
struct CollectionConfig {
    params: CollectionConfigParams,
}

#[derive(Debug, Deserialize)]
struct CollectionConfigParams {
    #[serde(default)]
    vectors: Option<VectorsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VectorsConfig {
    Single(VectorParams),
    Named(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Serialize)]
struct ScrollRequest<'a> {
    filter: &'a Filter,
    limit: usize,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    #[serde(default)]
    points: Vec<StoredRecord>,
    #[allow(dead_code)]
    #[serde(default)]
    next_page_offset: Option<Value>,
}
