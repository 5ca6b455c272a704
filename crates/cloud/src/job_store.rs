//! S3 implementation of the [`JobStore`] trait.
//!
//! One JSON document per job at `{prefix}/{job_id}.json`. Writes use
//! plain `put_object`, which gives the overwrite semantics the trait
//! requires.

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;

use sdxl_core::job::JobRecord;
use sdxl_core::store::{JobStore, StoreError};

/// Default key prefix for stored Job Records.
pub const DEFAULT_JOB_PREFIX: &str = "sdxl_jobs";

/// Job store backed by an S3 bucket.
pub struct S3JobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3JobStore {
    /// Create a store writing under [`DEFAULT_JOB_PREFIX`] in `bucket`.
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self::with_prefix(client, bucket, DEFAULT_JOB_PREFIX.to_string())
    }

    /// Create a store with an explicit key prefix.
    pub fn with_prefix(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    fn key(&self, job_id: &str) -> String {
        record_key(&self.prefix, job_id)
    }
}

/// Object key for a job id under a (already normalized) prefix.
fn record_key(prefix: &str, job_id: &str) -> String {
    format!("{}/{}.json", prefix.trim_matches('/'), job_id)
}

#[async_trait]
impl JobStore for S3JobStore {
    async fn exists(&self, job_id: &str) -> Result<bool, StoreError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.key(job_id))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_head_not_found(&err) => Ok(false),
            Err(err) => Err(StoreError::Backend(err.to_string())),
        }
    }

    async fn read(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(job_id))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) if is_get_not_found(&err) => return Ok(None),
            Err(err) => return Err(StoreError::Backend(err.to_string())),
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .into_bytes();

        let record = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("job {job_id}: {e}")))?;
        Ok(Some(record))
    }

    async fn write(&self, job_id: &str, record: &JobRecord) -> Result<(), StoreError> {
        let body =
            serde_json::to_vec(record).map_err(|e| StoreError::Backend(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key(job_id))
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(job_id = %job_id, status = ?record.status, "Job record written");
        Ok(())
    }
}

fn is_head_not_found<R>(err: &SdkError<HeadObjectError, R>) -> bool {
    err.as_service_error()
        .map(HeadObjectError::is_not_found)
        .unwrap_or(false)
}

fn is_get_not_found<R>(err: &SdkError<GetObjectError, R>) -> bool {
    err.as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false)
}
