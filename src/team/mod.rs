//! Per-team aggregate state
//!
//! Classical standings counters, the recent-form window and the append-only
//! rating history for a single team.

pub mod aggregate;
pub mod form;

// Re-export commonly used types
pub use aggregate::{SplitRecord, Team};
pub use form::{RecentForm, FORM_WINDOW};
