//! Handler for the job submission/polling endpoint.
//!
//! Routes:
//! - `POST /api/v1/jobs` — submit a new job (body has `prompt`) or poll
//!   an existing one (body has `jobId`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use sdxl_core::orchestrator::{JobOutcome, JobRequest};

use crate::error::AppResult;
use crate::response::JobResponse;
use crate::state::AppState;

/// Request body: exactly one of the two modes applies depending on
/// whether `jobId` is present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequestBody {
    /// Generation prompt (submit mode).
    #[serde(default)]
    pub prompt: Option<String>,
    /// Provider-assigned job id (resume mode).
    #[serde(default)]
    pub job_id: Option<String>,
}

/// POST /api/v1/jobs
///
/// Submit mode returns 202 with `{"status":"pending","jobId":...}`.
/// Resume mode returns 200 with either a pending or success body.
/// Errors map to 400/404/500 via [`AppError`](crate::error::AppError).
pub async fn submit_or_poll(
    State(state): State<AppState>,
    Json(body): Json<JobRequestBody>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .broker
        .handle(JobRequest {
            prompt: body.prompt,
            job_id: body.job_id,
        })
        .await?;

    let response = match outcome {
        // Freshly accepted, not yet resolved.
        JobOutcome::Accepted { job_id } => (
            StatusCode::ACCEPTED,
            Json(JobResponse::Pending { job_id }),
        ),
        JobOutcome::Pending { job_id } => {
            (StatusCode::OK, Json(JobResponse::Pending { job_id }))
        }
        JobOutcome::Complete { public_url } => {
            (StatusCode::OK, Json(JobResponse::Success { public_url }))
        }
    };
    Ok(response)
}
