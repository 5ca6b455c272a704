//! Shared test fixtures: in-memory collaborator fakes and a router
//! built through the production `build_app_router`, so integration
//! tests exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery) that production uses.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sdxl_api::config::ServerConfig;
use sdxl_api::router::build_app_router;
use sdxl_api::state::AppState;
use sdxl_core::artifact::ArtifactStore;
use sdxl_core::job::JobRecord;
use sdxl_core::orchestrator::JobBroker;
use sdxl_core::provider::{
    GenerationConfig, JobPoll, ProviderClient, ProviderError, ProviderJobState,
};
use sdxl_core::store::{JobStore, StoreError};

/// Scripted provider fake: submissions return a fixed id, status polls
/// replay whatever the test scripted last. Counts calls so tests can
/// assert the terminal-state short-circuit.
pub struct ScriptedProvider {
    submit_id: Mutex<Option<String>>,
    poll: Mutex<Option<JobPoll>>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            submit_id: Mutex::new(Some("job-1".to_string())),
            poll: Mutex::new(None),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Make the next submission fail with a malformed response.
    pub fn break_submit(&self) {
        *self.submit_id.lock().unwrap() = None;
    }

    pub fn script_poll(&self, state: ProviderJobState, output: Option<Value>) {
        *self.poll.lock().unwrap() = Some(JobPoll { state, output });
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn submit(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit_id.lock().unwrap().clone().ok_or_else(|| {
            ProviderError::MalformedResponse("run response has no job id".to_string())
        })
    }

    async fn status(&self, _job_id: &str) -> Result<JobPoll, ProviderError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.poll
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::Request("no scripted poll".to_string()))
    }
}

/// In-memory job store.
#[derive(Default)]
pub struct MemoryJobStore {
    records: Mutex<HashMap<String, JobRecord>>,
}

impl MemoryJobStore {
    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.records.lock().unwrap().get(job_id).cloned()
    }

    pub fn insert(&self, job_id: &str, record: JobRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(job_id.to_string(), record);
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn exists(&self, job_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.lock().unwrap().contains_key(job_id))
    }

    async fn read(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.get(job_id))
    }

    async fn write(&self, job_id: &str, record: &JobRecord) -> Result<(), StoreError> {
        self.insert(job_id, record.clone());
        Ok(())
    }
}

/// In-memory artifact store counting writes.
#[derive(Default)]
pub struct MemoryArtifactStore {
    pub puts: AtomicUsize,
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://cdn.test/{key}"))
    }
}

/// Router plus handles to the fakes behind it.
pub struct TestApp {
    pub app: Router,
    pub provider: Arc<ScriptedProvider>,
    pub jobs: Arc<MemoryJobStore>,
    pub artifacts: Arc<MemoryArtifactStore>,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the production router wired to in-memory fakes.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let provider = Arc::new(ScriptedProvider::new());
    let jobs = Arc::new(MemoryJobStore::default());
    let artifacts = Arc::new(MemoryArtifactStore::default());

    let broker = Arc::new(JobBroker::new(
        provider.clone(),
        jobs.clone(),
        artifacts.clone(),
        GenerationConfig::default(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        broker,
    };

    TestApp {
        app: build_app_router(state, &config),
        provider,
        jobs,
        artifacts,
    }
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Convenience wrapper asserting an error-shaped body.
pub async fn assert_error_body(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    json["message"].as_str().expect("message field").to_string()
}
