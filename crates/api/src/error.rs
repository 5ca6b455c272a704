use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sdxl_core::orchestrator::BrokerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`BrokerError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the caller-facing
/// `{"status":"error","message":...}` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the job broker.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Broker(broker) => match broker {
                BrokerError::InvalidRequest => {
                    (StatusCode::BAD_REQUEST, "Missing prompt".to_string())
                }
                BrokerError::UnknownJob(id) => {
                    (StatusCode::NOT_FOUND, format!("Unknown jobId: {id}"))
                }
                BrokerError::Provider(err) => {
                    tracing::error!(error = %err, "Provider request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Image generation provider request failed".to_string(),
                    )
                }
                BrokerError::ProviderFailed => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Generation job failed".to_string(),
                ),
                BrokerError::Store(err) => {
                    tracing::error!(error = %err, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "status": "error",
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
