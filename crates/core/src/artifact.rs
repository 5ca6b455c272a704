//! Artifact store trait: durable blob storage for generated images.

use async_trait::async_trait;

use crate::store::StoreError;

/// Blob storage that accepts raw bytes and returns a stable,
/// externally dereferenceable URL. The S3-backed implementation lives
/// in `sdxl-cloud`.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key` with the given content type.
    /// Returns the public URL of the stored object.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;
}
