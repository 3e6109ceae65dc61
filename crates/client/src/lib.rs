//! # Coherence Client
//!
//! Talks to the Coherence backend on behalf of the patient portal.
//!
//! - **Config**: environment-driven settings (API URL, token, timezone)
//! - **Api**: one async call per backend endpoint behind the [`api::PortalApi`] trait
//! - **Editor**: the dose window editing flow, validating locally before
//!   anything is submitted

/// Configuration loaded from the environment
pub mod config;
/// Backend endpoints
pub mod api;
/// Dose window editing flow
pub mod editor;

pub use api::{HttpPortalApi, PortalApi};
pub use config::ClientConfig;
pub use editor::DoseWindowEditor;
