use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount the jobs endpoint under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/jobs", post(handlers::jobs::submit_or_poll))
}
