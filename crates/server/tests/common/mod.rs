//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router over
//! temporary media and cache directories, with a fake tool runner so no
//! encoder needs to be installed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use reelcache_core::{
    testing::{fixtures, FakeToolRunner},
    CommandBuilder, Config, MetricsReporter, Orchestrator, Reporter, Reporters,
};
use reelcache_server::api::create_router;
use reelcache_server::state::AppState;

/// Test fixture for API testing with a fake tool runner.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list() {
///     let fixture = TestFixture::new(&["photo.jpg"]).await;
///
///     let response = fixture.get("/list").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Fake runner - script failures and delays
    pub runner: FakeToolRunner,
    /// Source media directory
    pub media_dir: PathBuf,
    /// Sibling cache directory
    pub cache_dir: PathBuf,
    /// Root of the temporary tree
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub bytes: Bytes,
}

impl TestFixture {
    /// Create a fixture whose source directory holds `files`.
    pub async fn new(files: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let media_dir = fixtures::media_dir(temp_dir.path(), files)
            .expect("Failed to create media dir")
            .canonicalize()
            .expect("Failed to resolve media dir");
        let cache_dir = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to resolve temp dir")
            .join("cache");

        let static_dir = temp_dir.path().join("frontend");
        std::fs::create_dir(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), "<html>gallery</html>")
            .expect("Failed to write index");

        let mut config = Config::for_source_dir(&media_dir);
        config.server.static_dir = static_dir;

        let runner = FakeToolRunner::new();
        let metrics = MetricsReporter::new().expect("Failed to create metrics");
        let reporter: Arc<dyn Reporter> =
            Arc::new(Reporters::new().with(Arc::new(metrics.clone())));
        let orchestrator = Orchestrator::new(
            config.conversion.clone(),
            CommandBuilder::new(config.tools.clone()),
            Arc::new(runner.clone()),
            reporter,
        );

        let state = Arc::new(AppState::new(config, orchestrator, metrics));
        let router = create_router(Arc::clone(&state));

        Self {
            router,
            state,
            runner,
            media_dir,
            cache_dir,
            temp_dir,
        }
    }

    /// Put a file in the cache directory.
    pub fn cache_file(&self, name: &str, contents: &str) {
        std::fs::create_dir_all(&self.cache_dir).unwrap();
        std::fs::write(self.cache_dir.join(name), contents).unwrap();
    }

    /// Put a file in the source directory.
    pub fn media_file(&self, name: &str, contents: &str) {
        std::fs::write(self.media_dir.join(name), contents).unwrap();
    }

    /// Wait until no conversion run is in progress.
    pub async fn wait_idle(&self) {
        for _ in 0..200 {
            if !self.state.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Conversion run did not finish in time");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            bytes,
        }
    }
}
