use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sdxl_api::config::{BrokerConfig, ServerConfig};
use sdxl_api::{router, state};
use sdxl_cloud::{S3ArtifactStore, S3JobStore};
use sdxl_core::orchestrator::JobBroker;
use sdxl_core::provider::GenerationConfig;
use sdxl_runpod::RunPodApi;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sdxl_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let broker_config = BrokerConfig::from_env();
    tracing::info!(
        endpoint_id = %broker_config.runpod_endpoint_id,
        bucket = %broker_config.bucket,
        "Loaded broker configuration"
    );

    // --- Collaborators ---
    let s3 = sdxl_cloud::s3_client().await;
    tracing::info!("S3 client created");

    let jobs = match broker_config.job_prefix.clone() {
        Some(prefix) => S3JobStore::with_prefix(s3.clone(), broker_config.bucket.clone(), prefix),
        None => S3JobStore::new(s3.clone(), broker_config.bucket.clone()),
    };

    let artifacts = match broker_config.public_base_url.clone() {
        Some(base) => {
            S3ArtifactStore::with_public_base_url(s3.clone(), broker_config.bucket.clone(), base)
        }
        None => S3ArtifactStore::new(s3, broker_config.bucket.clone()),
    };

    let mut provider = RunPodApi::new(
        broker_config.runpod_api_key.clone(),
        broker_config.runpod_endpoint_id.clone(),
    )
    .with_status_timeout(broker_config.runpod_status_timeout);
    if let Some(base) = broker_config.runpod_api_base.clone() {
        provider = provider.with_base_url(base);
    }

    // --- Broker ---
    let broker = Arc::new(JobBroker::new(
        Arc::new(provider),
        Arc::new(jobs),
        Arc::new(artifacts),
        GenerationConfig::default(),
    ));
    tracing::info!("Job broker wired");

    // --- App state & router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        broker,
    };
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid host/port combination");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for a shutdown signal.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// drains cleanly under process supervisors.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
