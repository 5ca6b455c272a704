use std::sync::Arc;

use sdxl_core::orchestrator::JobBroker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The job lifecycle orchestrator with its wired collaborators.
    pub broker: Arc<JobBroker>,
}
