pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /jobs    submit a generation job or poll an existing one (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(jobs::router())
}
