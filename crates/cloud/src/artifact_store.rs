//! S3 implementation of the [`ArtifactStore`] trait.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use sdxl_core::artifact::ArtifactStore;
use sdxl_core::store::StoreError;

/// Artifact store backed by an S3 bucket.
///
/// `put` uploads the object and returns `{public_base_url}/{key}`. The
/// bucket (or the CDN in front of it) is expected to serve those keys
/// publicly; this store does not manage object ACLs.
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ArtifactStore {
    /// Create a store serving artifacts via the bucket's
    /// virtual-hosted S3 URL.
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        let public_base_url = default_public_base(&bucket);
        Self::with_public_base_url(client, bucket, public_base_url)
    }

    /// Create a store with an explicit public base URL (CDN, custom
    /// domain, or a non-AWS object store front).
    pub fn with_public_base_url(
        client: aws_sdk_s3::Client,
        bucket: String,
        public_base_url: String,
    ) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Virtual-hosted style URL for a bucket.
fn default_public_base(bucket: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com")
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let url = format!("{}/{}", self.public_base_url, key);
        tracing::info!(key = %key, bytes = size, url = %url, "Artifact uploaded");
        Ok(url)
    }
}
