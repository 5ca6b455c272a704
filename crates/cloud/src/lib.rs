//! S3-backed implementations of the `sdxl-core` storage traits.
//!
//! Job Records live as JSON documents under a key prefix; artifacts are
//! uploaded as raw objects and exposed through a public base URL. Both
//! stores share one [`aws_sdk_s3::Client`] built from the ambient AWS
//! configuration chain.

pub mod artifact_store;
pub mod job_store;

pub use artifact_store::S3ArtifactStore;
pub use job_store::S3JobStore;

/// Build an S3 client from the default AWS configuration chain
/// (environment, shared config file, instance metadata).
pub async fn s3_client() -> aws_sdk_s3::Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    aws_sdk_s3::Client::new(&config)
}
