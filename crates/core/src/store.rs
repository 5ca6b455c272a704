//! Job store trait: durable key-value storage for Job Records.
//!
//! Keyed by provider-assigned job id, one JSON document per job.
//! Writes have overwrite semantics (no merge). The S3-backed
//! implementation lives in `sdxl-cloud`.

use async_trait::async_trait;

use crate::job::JobRecord;

/// Errors from the durable storage layer (both job and artifact stores).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation.
    #[error("storage operation failed: {0}")]
    Backend(String),

    /// A stored document exists but cannot be interpreted.
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

/// Durable store holding one [`JobRecord`] per job id.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Whether a record exists for `job_id`.
    async fn exists(&self, job_id: &str) -> Result<bool, StoreError>;

    /// Read the record for `job_id`, or `None` if absent.
    async fn read(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError>;

    /// Write (overwrite) the record for `job_id`.
    async fn write(&self, job_id: &str, record: &JobRecord) -> Result<(), StoreError>;
}
