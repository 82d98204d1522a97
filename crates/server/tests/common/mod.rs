//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock file provider and metadata resolver injected, so the whole
//! HTTP surface can be exercised without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sharestream_core::testing::{MockFileProvider, MockMetadataResolver};
use sharestream_core::{Config, FileProvider, MetadataResolver};
use sharestream_server::state::AppState;

/// Re-export fixtures for test convenience
pub use sharestream_core::testing::fixtures;

/// Public URL the fixture's playback links point at.
pub const PUBLIC_URL: &str = "http://streams.test";

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_streams() {
///     let fixture = TestFixture::new().await;
///     fixture.provider.set_results("Movie", vec![fixtures::candidate("a", "Movie.mkv")]).await;
///
///     let response = fixture.post("/api/v1/streams", json!({
///         "login": "user",
///         "password": "pass",
///         "descriptor": { "type": "movie", "localized_names": ["Movie"] }
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock file provider - configure search results and details
    pub provider: Arc<MockFileProvider>,
    /// Mock metadata resolver - configure descriptors by media id
    pub metadata: Arc<MockMetadataResolver>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let provider = Arc::new(MockFileProvider::new());
        let metadata = Arc::new(MockMetadataResolver::new());

        let mut config = Config::default();
        config.server.public_url = PUBLIC_URL.to_string();
        config.search.query_delay_ms = 0;
        config.enrichment.chunk_delay_ms = 0;

        let resolver = if test_config.without_metadata {
            None
        } else {
            Some(Arc::clone(&metadata) as Arc<dyn MetadataResolver>)
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&provider) as Arc<dyn FileProvider>,
            resolver,
        ));

        let router = sharestream_server::api::create_router(state);

        Self {
            router,
            provider,
            metadata,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Run without a metadata resolver
    pub without_metadata: bool,
}
