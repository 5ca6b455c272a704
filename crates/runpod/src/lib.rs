//! RunPod serverless REST client.
//!
//! Implements the `sdxl-core` [`ProviderClient`] trait against the
//! RunPod serverless API (`/run` to submit, `/status/{id}` to poll)
//! using [`reqwest`].
//!
//! [`ProviderClient`]: sdxl_core::provider::ProviderClient

pub mod api;

pub use api::RunPodApi;
