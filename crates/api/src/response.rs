//! Caller-facing response envelope for the jobs endpoint.
//!
//! The wire format is the original service contract: a `status`
//! discriminator (`pending` | `success` | `error`) with either `jobId`
//! or `public_url`. Error bodies are produced by
//! [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Successful (non-error) response body for `POST /api/v1/jobs`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobResponse {
    /// Job accepted or still running; poll again with `jobId`.
    Pending {
        #[serde(rename = "jobId")]
        job_id: String,
    },
    /// Job finished; the artifact is at `public_url`.
    Success { public_url: String },
}
