//! Server and broker configuration loaded from environment variables.

use std::time::Duration;

/// HTTP server configuration.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Must cover the
    /// provider status-call timeout with headroom.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

/// Configuration for the job broker's collaborators, loaded once at
/// process start and passed explicitly -- no ambient globals.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// RunPod API key (bearer token).
    pub runpod_api_key: String,
    /// RunPod serverless endpoint id.
    pub runpod_endpoint_id: String,
    /// Optional API base override (`RUNPOD_API_BASE`).
    pub runpod_api_base: Option<String>,
    /// Timeout for provider status calls, 5-90 s.
    pub runpod_status_timeout: Duration,
    /// S3 bucket holding job records and artifacts.
    pub bucket: String,
    /// Key prefix for job records (`JOB_STORE_PREFIX`).
    pub job_prefix: Option<String>,
    /// Public base URL for artifacts (`PUBLIC_BASE_URL`); defaults to
    /// the bucket's virtual-hosted S3 URL.
    pub public_base_url: Option<String>,
}

impl BrokerConfig {
    /// Load broker configuration from environment variables.
    ///
    /// Panics on missing required variables; misconfiguration should
    /// fail fast at startup.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `RUNPOD_API_KEY`             | yes      |         |
    /// | `RUNPOD_ENDPOINT_ID`         | yes      |         |
    /// | `ARTIFACT_BUCKET_NAME`       | yes      |         |
    /// | `RUNPOD_API_BASE`            | no       | production API |
    /// | `RUNPOD_STATUS_TIMEOUT_SECS` | no       | `90`    |
    /// | `JOB_STORE_PREFIX`           | no       | `sdxl_jobs` |
    /// | `PUBLIC_BASE_URL`            | no       | bucket S3 URL |
    pub fn from_env() -> Self {
        let runpod_api_key =
            std::env::var("RUNPOD_API_KEY").expect("RUNPOD_API_KEY must be set");
        let runpod_endpoint_id =
            std::env::var("RUNPOD_ENDPOINT_ID").expect("RUNPOD_ENDPOINT_ID must be set");
        let bucket =
            std::env::var("ARTIFACT_BUCKET_NAME").expect("ARTIFACT_BUCKET_NAME must be set");

        let status_timeout_secs: u64 = std::env::var("RUNPOD_STATUS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("RUNPOD_STATUS_TIMEOUT_SECS must be a valid u64");
        // Bounded per the resource model: shorter trades correctness on
        // slow providers for responsiveness, longer risks caller timeouts.
        let runpod_status_timeout = Duration::from_secs(status_timeout_secs.clamp(5, 90));

        Self {
            runpod_api_key,
            runpod_endpoint_id,
            runpod_api_base: std::env::var("RUNPOD_API_BASE").ok(),
            runpod_status_timeout,
            bucket,
            job_prefix: std::env::var("JOB_STORE_PREFIX").ok(),
            public_base_url: std::env::var("PUBLIC_BASE_URL").ok(),
        }
    }
}
