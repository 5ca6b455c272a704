//! Provider client trait and its request/response types.
//!
//! The provider is a remote asynchronous inference API with two
//! operations: submit a generation job, and poll a job's status. The
//! concrete RunPod implementation lives in `sdxl-runpod`; tests use
//! in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;

/// Static generation policy sent with every submission.
///
/// Resolution and step count are fixed system policy, not user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 1792,
            height: 1024,
            num_inference_steps: 25,
        }
    }
}

/// Provider-side job state as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderJobState {
    InQueue,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    /// Any status string this client does not recognize. Treated as
    /// non-terminal by the orchestrator.
    Other(String),
}

impl ProviderJobState {
    /// Map a raw provider status string onto a known state.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "IN_QUEUE" => ProviderJobState::InQueue,
            "IN_PROGRESS" => ProviderJobState::InProgress,
            "COMPLETED" => ProviderJobState::Completed,
            "FAILED" => ProviderJobState::Failed,
            "CANCELLED" => ProviderJobState::Cancelled,
            other => ProviderJobState::Other(other.to_string()),
        }
    }
}

/// One status-poll result: the provider's state plus its raw `output`
/// value, shape unspecified (see [`crate::normalizer`]).
#[derive(Debug, Clone)]
pub struct JobPoll {
    pub state: ProviderJobState,
    pub output: Option<Value>,
}

/// Errors from the provider client layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request itself failed (network, DNS, TLS, timeout).
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider returned a non-2xx status code.
    #[error("provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider's response body did not match the expected schema.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Client for the remote asynchronous inference API.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Submit a generation job. Returns the provider-assigned job id.
    async fn submit(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ProviderError>;

    /// Poll the status of a previously submitted job.
    async fn status(&self, job_id: &str) -> Result<JobPoll, ProviderError>;
}
