//! # Coherence Core
//!
//! Domain types shared by the Coherence portal client: dose windows and the
//! rules deciding whether one may be saved, patient and account payloads
//! exchanged with the backend, health metric readings, and time-of-day
//! helpers.
//!
//! Nothing in this crate performs I/O.

/// Error type shared by every Coherence crate
pub mod errors;
/// Wire and domain models
pub mod models;
/// Local time-of-day, timezone and 12-hour clock helpers
pub mod time;
/// Dose window overlap and duration validation
pub mod validation;
