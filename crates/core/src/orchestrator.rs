//! Job lifecycle orchestrator.
//!
//! One [`JobBroker::handle`] call is a single short-lived unit of work:
//! at most one provider call, one store read, and one store write. The
//! caller re-invokes on its own schedule until the job reaches a
//! terminal state; the broker keeps no state between calls beyond the
//! persisted Job Record.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use crate::artifact::ArtifactStore;
use crate::job::{JobRecord, JobStatus};
use crate::normalizer::{self, NormalizeError};
use crate::provider::{GenerationConfig, ProviderClient, ProviderError, ProviderJobState};
use crate::store::{JobStore, StoreError};

/// Content type of every stored artifact.
const ARTIFACT_CONTENT_TYPE: &str = "image/png";

/// Caller request: exactly one mode applies depending on `job_id`.
///
/// - no `job_id`: submit a new job for `prompt`;
/// - `job_id` present: resume polling that job.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    pub prompt: Option<String>,
    pub job_id: Option<String>,
}

/// Successful outcome of one [`JobBroker::handle`] invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// A new job was submitted and accepted by the provider.
    Accepted { job_id: String },
    /// The job has not reached a terminal state yet; poll again.
    Pending { job_id: String },
    /// The job finished and its artifact is publicly addressable.
    Complete { public_url: String },
}

/// Errors surfaced to the caller of [`JobBroker::handle`].
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// Submit mode without a usable prompt.
    #[error("missing prompt")]
    InvalidRequest,

    /// Resume mode for a job id with no stored record.
    #[error("unknown job id: {0}")]
    UnknownJob(String),

    /// The provider call failed. Not retried here; the caller retries
    /// by re-polling.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider explicitly reported failure or cancellation.
    /// Recorded as terminal `FAILED`.
    #[error("generation job failed on the provider")]
    ProviderFailed,

    /// The job or artifact store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives the job lifecycle state machine over the collaborator traits.
///
/// Constructed once at process start with explicit configuration; no
/// ambient global state.
pub struct JobBroker {
    provider: Arc<dyn ProviderClient>,
    jobs: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    generation: GenerationConfig,
}

impl JobBroker {
    pub fn new(
        provider: Arc<dyn ProviderClient>,
        jobs: Arc<dyn JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            jobs,
            artifacts,
            generation,
        }
    }

    /// Handle one caller request: submit a new job or resume an
    /// existing one.
    pub async fn handle(&self, request: JobRequest) -> Result<JobOutcome, BrokerError> {
        match request.job_id {
            None => self.submit(request.prompt).await,
            Some(job_id) => self.resume(job_id).await,
        }
    }

    /// Mode A: submit a new generation job and persist a PENDING record.
    async fn submit(&self, prompt: Option<String>) -> Result<JobOutcome, BrokerError> {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or(BrokerError::InvalidRequest)?;

        let job_id = self.provider.submit(&prompt, &self.generation).await?;
        self.jobs
            .write(&job_id, &JobRecord::new_pending(&prompt))
            .await?;

        tracing::info!(job_id = %job_id, "Generation job submitted");
        Ok(JobOutcome::Accepted { job_id })
    }

    /// Mode B: resolve the current state of an existing job.
    async fn resume(&self, job_id: String) -> Result<JobOutcome, BrokerError> {
        let record = self
            .jobs
            .read(&job_id)
            .await?
            .ok_or_else(|| BrokerError::UnknownJob(job_id.clone()))?;

        // Terminal-state short-circuit: never re-poll a finished job.
        match record.status {
            JobStatus::Complete => {
                let public_url = record.public_url.clone().ok_or_else(|| {
                    StoreError::Corrupt(format!("COMPLETE record {job_id} has no public_url"))
                })?;
                return Ok(JobOutcome::Complete { public_url });
            }
            JobStatus::Failed => return Err(BrokerError::ProviderFailed),
            JobStatus::Pending => {}
        }

        let poll = self.provider.status(&job_id).await?;
        match poll.state {
            ProviderJobState::Failed | ProviderJobState::Cancelled => {
                self.jobs.write(&job_id, &record.into_failed()).await?;
                tracing::warn!(job_id = %job_id, state = ?poll.state, "Provider reported job failure");
                Err(BrokerError::ProviderFailed)
            }
            ProviderJobState::Completed => self.finish(job_id, record, poll.output).await,
            // IN_QUEUE, IN_PROGRESS, or anything unrecognized: still
            // running, record untouched.
            _ => Ok(JobOutcome::Pending { job_id }),
        }
    }

    /// PENDING -> COMPLETE: extract, decode, store the artifact, and
    /// persist the terminal record.
    ///
    /// Extraction and decode failures on an ostensibly completed job are
    /// reported as `Pending` rather than errors: a provider may mark a
    /// job COMPLETED before its output is fully materialized, and that
    /// case is indistinguishable from malformed output at this layer.
    async fn finish(
        &self,
        job_id: String,
        record: JobRecord,
        output: Option<Value>,
    ) -> Result<JobOutcome, BrokerError> {
        let output = output.unwrap_or(Value::Null);

        let payload = match normalizer::extract_image_payload(&output) {
            Ok(payload) => payload,
            Err(NormalizeError::NoPayload) => {
                tracing::warn!(job_id = %job_id, "Completed job has no extractable image yet");
                return Ok(JobOutcome::Pending { job_id });
            }
        };

        let bytes = match BASE64.decode(payload.as_bytes()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(job_id = %job_id, error = %err, "Image payload is not valid base64");
                return Ok(JobOutcome::Pending { job_id });
            }
        };

        let key = artifact_key();
        let public_url = self
            .artifacts
            .put(&key, bytes, ARTIFACT_CONTENT_TYPE)
            .await?;

        self.jobs
            .write(&job_id, &record.into_complete(public_url.clone()))
            .await?;

        tracing::info!(job_id = %job_id, public_url = %public_url, "Artifact stored, job complete");
        Ok(JobOutcome::Complete { public_url })
    }
}

/// Fresh, collision-resistant artifact key. Independent of prompt and
/// job id so retries never overwrite an existing object.
fn artifact_key() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("generated/sdxl_{}.png", &id[..8])
}
