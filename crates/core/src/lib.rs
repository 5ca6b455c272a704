//! Domain logic for the SDXL job broker.
//!
//! Defines the job lifecycle state machine, the tolerant provider-output
//! normalizer, and the collaborator traits (provider client, job store,
//! artifact store) that the orchestrator drives. Implementations of the
//! collaborators live in `sdxl-runpod` and `sdxl-cloud`.

pub mod artifact;
pub mod job;
pub mod normalizer;
pub mod orchestrator;
pub mod provider;
pub mod store;
