//! Job Record types and lifecycle state machine.
//!
//! One record exists per provider-assigned job id, stored as a JSON
//! document in the job store. Transitions:
//!
//! ```text
//! PENDING -> COMPLETE   (image extracted and stored)
//! PENDING -> FAILED     (provider reported failure/cancellation)
//! PENDING -> PENDING    (no-op, non-terminal poll)
//! ```
//!
//! `COMPLETE` and `FAILED` are terminal and sticky: no transition ever
//! leaves them.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a generation job.
///
/// Serialized as the uppercase wire strings (`PENDING`, `COMPLETE`,
/// `FAILED`) used in stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    /// Submitted to the provider, result not yet materialized.
    Pending,
    /// Artifact stored and publicly addressable.
    Complete,
    /// Provider reported failure or cancellation.
    Failed,
}

impl JobStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Durable state document tracking one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Original generation prompt. Immutable once set.
    pub prompt: String,
    /// Public artifact URL. Present iff `status == Complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl JobRecord {
    /// Fresh record for a newly submitted job.
    pub fn new_pending(prompt: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Pending,
            prompt: prompt.into(),
            public_url: None,
        }
    }

    /// Transition into `COMPLETE` with the stored artifact's URL.
    ///
    /// Terminal states are sticky: if the record is already terminal it
    /// is returned unchanged.
    pub fn into_complete(self, public_url: String) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        Self {
            status: JobStatus::Complete,
            prompt: self.prompt,
            public_url: Some(public_url),
        }
    }

    /// Transition into `FAILED`.
    ///
    /// Terminal states are sticky: if the record is already terminal it
    /// is returned unchanged.
    pub fn into_failed(self) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        Self {
            status: JobStatus::Failed,
            prompt: self.prompt,
            public_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- serialization --------------------------------------------------------

    #[test]
    fn status_serializes_to_uppercase_wire_strings() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Complete).unwrap(),
            "\"COMPLETE\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"FAILED\""
        );
    }

    #[test]
    fn pending_record_omits_public_url() {
        let json = serde_json::to_value(JobRecord::new_pending("sunset")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "PENDING", "prompt": "sunset" })
        );
    }

    #[test]
    fn complete_record_round_trips() {
        let record = JobRecord::new_pending("sunset").into_complete("https://x/y.png".into());
        let json = serde_json::to_string(&record).unwrap();
        let back: JobRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    // -- transitions ----------------------------------------------------------

    #[test]
    fn pending_transitions_to_complete_with_url() {
        let record = JobRecord::new_pending("sunset").into_complete("https://x/y.png".into());
        assert_eq!(record.status, JobStatus::Complete);
        assert_eq!(record.public_url.as_deref(), Some("https://x/y.png"));
        assert_eq!(record.prompt, "sunset");
    }

    #[test]
    fn pending_transitions_to_failed() {
        let record = JobRecord::new_pending("sunset").into_failed();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.public_url, None);
    }

    #[test]
    fn terminal_states_are_sticky() {
        let failed = JobRecord::new_pending("a").into_failed();
        assert_eq!(
            failed.clone().into_complete("https://x/y.png".into()),
            failed
        );

        let complete = JobRecord::new_pending("a").into_complete("https://x/y.png".into());
        assert_eq!(complete.clone().into_failed(), complete);
        assert_eq!(
            complete.clone().into_complete("https://other.png".into()),
            complete
        );
    }

    #[test]
    fn terminality() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
