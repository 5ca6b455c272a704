//! HTTP client for the RunPod serverless endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use sdxl_core::provider::{
    GenerationConfig, JobPoll, ProviderClient, ProviderError, ProviderJobState,
};

/// Production RunPod API base.
pub const DEFAULT_BASE_URL: &str = "https://api.runpod.ai/v2";

/// Timeout for the submit call. Submission only enqueues the job, so a
/// short bound is enough.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for the status call. RunPod can hold the request
/// open while the job settles; anything in the 5-90 s range is
/// acceptable per the broker's resource model.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP client for a single RunPod serverless endpoint.
pub struct RunPodApi {
    client: reqwest::Client,
    base_url: String,
    endpoint_id: String,
    api_key: String,
    status_timeout: Duration,
}

/// Response returned by `POST /{endpoint}/run` after queuing a job.
#[derive(Debug, Deserialize)]
struct RunResponse {
    /// Server-assigned job id.
    id: Option<String>,
}

/// Response returned by `GET /{endpoint}/status/{id}`.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    #[serde(default)]
    output: Option<Value>,
}

impl RunPodApi {
    /// Create a client for one serverless endpoint, using the
    /// production base URL and default timeouts.
    pub fn new(api_key: String, endpoint_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_id,
            api_key,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    /// Override the API base URL (local mocks, regional endpoints).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the status-call timeout. Values outside 5-90 s trade
    /// correctness on slow providers for responsiveness.
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    fn run_url(&self) -> String {
        format!("{}/{}/run", self.base_url, self.endpoint_id)
    }

    fn status_url(&self, job_id: &str) -> String {
        format!("{}/{}/status/{}", self.base_url, self.endpoint_id, job_id)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code; non-2xx becomes
    /// [`ProviderError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ProviderClient for RunPodApi {
    /// Submit a generation job via `POST /{endpoint}/run`.
    async fn submit(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "input": {
                "prompt": prompt,
                "height": config.height,
                "width": config.width,
                "num_inference_steps": config.num_inference_steps,
            }
        });

        let response = self
            .client
            .post(self.run_url())
            .bearer_auth(&self.api_key)
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let run: RunResponse = Self::parse_response(response).await?;
        run.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ProviderError::MalformedResponse("run response has no job id".to_string())
        })
    }

    /// Poll a job via `GET /{endpoint}/status/{id}`.
    async fn status(&self, job_id: &str) -> Result<JobPoll, ProviderError> {
        let response = self
            .client
            .get(self.status_url(job_id))
            .bearer_auth(&self.api_key)
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status: StatusResponse = Self::parse_response(response).await?;
        let state = status
            .status
            .as_deref()
            .map(ProviderJobState::from_wire)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("status response has no status field".to_string())
            })?;

        tracing::debug!(job_id = %job_id, state = ?state, "Polled provider status");
        Ok(JobPoll {
            state,
            output: status.output,
        })
    }
}
