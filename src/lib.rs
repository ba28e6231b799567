//! puckrank - Glicko-2 ratings, standings and projections for a hockey league
//!
//! This crate folds a season's match history into per-team ratings and
//! standings counters, orders and groups the standings table, and projects
//! season-ending totals from the remaining schedule.

pub mod config;
pub mod error;
pub mod projection;
pub mod rating;
pub mod season;
pub mod standings;
pub mod team;
pub mod types;

// Re-export commonly used types and traits
pub use error::{EngineError, Result};
pub use types::*;

// Re-export key components
pub use projection::{Projection, Projector};
pub use rating::{Glicko2Calculator, RatingCalculator};
pub use season::Season;
pub use standings::{LeagueInfo, StandingsComposer, StandingsOrder};
pub use team::Team;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
