//! Configuration management for the puckrank engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the rating, standings and
//! projection components.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ProjectionSettings, ServiceSettings, StandingsSettings};
pub use rating::{RatingConfig, ScoreMapping};
