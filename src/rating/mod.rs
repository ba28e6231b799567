//! Rating system integration using the Glicko-2 method
//!
//! This module provides the per-match rating update, the win-probability
//! function and the calculator interface used by the season fold.

pub mod calculator;
pub mod glicko2;

// Re-export commonly used types
pub use calculator::{MatchRatingResult, RatingCalculator, RatingChange};
pub use glicko2::Glicko2Calculator;
