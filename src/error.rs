//! Error types for the rating and standings engine
//!
//! Fallible operations return `anyhow::Result`; the concrete failure kinds
//! live in [`EngineError`] so callers can downcast and decide whether to abort
//! the run or degrade.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Failure kinds raised by the engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid score for rating update: {score}")]
    InvalidScore { score: f64 },

    #[error("Volatility did not converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Unknown standings column: {column}")]
    UnknownColumn { column: String },

    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Match on {date} ({home} vs {away}) is dated before the last folded match on {last}")]
    OutOfOrder {
        date: chrono::NaiveDate,
        last: chrono::NaiveDate,
        home: String,
        away: String,
    },

    #[error("Expected {expected} teams in the league, found {actual}")]
    LeagueSize { expected: usize, actual: usize },

    #[error("Team {team} duplicates franchise {franchise}")]
    DuplicateFranchise { team: String, franchise: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Extract the engine error kind from an `anyhow` error, if it carries one
pub fn engine_error(err: &anyhow::Error) -> Option<&EngineError> {
    err.downcast_ref::<EngineError>()
}
