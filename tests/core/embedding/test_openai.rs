// OpenAI-compatible embedding client against a mock server

use codevec::core::embedding::{EmbeddingProvider, OpenAiEmbedder};
use codevec::core::error::CodevecError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "text-embedding-ada-002";

fn embedder(server: &MockServer, dimensions: usize) -> OpenAiEmbedder {
    let base_url = format!("{}/v1", server.uri());
    OpenAiEmbedder::new("sk-test", &base_url, MODEL, dimensions, Duration::from_secs(5)).unwrap()
}

fn embedding_response(vector: Vec<f32>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "object": "list",
        "data": [{"object": "embedding", "index": 0, "embedding": vector}],
        "model": MODEL,
        "usage": {"prompt_tokens": 4, "total_tokens": 4}
    }))
}

#[tokio::test]
async fn test_embed_returns_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({"model": MODEL, "input": "function f(){}"})))
        .respond_with(embedding_response(vec![0.25, -0.5, 1.0]))
        .expect(1)
        .mount(&server)
        .await;

    let vector = embedder(&server, 3).embed("function f(){}").await.unwrap();
    assert_eq!(vector, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn test_wrong_length_is_dimension_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(embedding_response(vec![0.1, 0.2]))
        .mount(&server)
        .await;

    let err = embedder(&server, 1536).embed("x").await.unwrap_err();
    assert!(matches!(
        err,
        CodevecError::DimensionMismatch {
            expected: 1536,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = embedder(&server, 3).embed("x").await.unwrap_err();
    assert!(matches!(err, CodevecError::ProviderUnauthorized(_)));
    assert!(!err.aborts_run());
}

#[tokio::test]
async fn test_rate_limited_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = embedder(&server, 3).embed("x").await.unwrap_err();
    assert!(matches!(err, CodevecError::ProviderRateLimited(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = embedder(&server, 3).embed("x").await.unwrap_err();
    assert!(matches!(err, CodevecError::ProviderError(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_provider_error() {
    // Nothing listens on the discard port
    let embedder = OpenAiEmbedder::new(
        "sk-test",
        "http://127.0.0.1:9/v1",
        MODEL,
        3,
        Duration::from_secs(2),
    )
    .unwrap();

    let err = embedder.embed("x").await.unwrap_err();
    assert!(matches!(err, CodevecError::ProviderError(_)));
}
