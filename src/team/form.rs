//! Rolling window of recent results

use crate::types::GameResult;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of results kept in the recent-form window
pub const FORM_WINDOW: usize = 10;

/// Bounded FIFO of the most recent results, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    results: VecDeque<GameResult>,
}

impl RecentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result, dropping the oldest once the window is full
    pub fn push(&mut self, result: GameResult) {
        if self.results.len() == FORM_WINDOW {
            self.results.pop_front();
        }
        self.results.push_back(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameResult> {
        self.results.iter()
    }

    /// (wins, losses, overtime losses) within the window
    pub fn counts(&self) -> (usize, usize, usize) {
        self.results
            .iter()
            .fold((0, 0, 0), |(w, l, otl), result| match result {
                GameResult::Win => (w + 1, l, otl),
                GameResult::Loss => (w, l + 1, otl),
                GameResult::OvertimeLoss => (w, l, otl + 1),
            })
    }

    /// Run of identical results at the tail of the window
    pub fn streak(&self) -> Option<(GameResult, usize)> {
        let last = *self.results.back()?;
        let length = self
            .results
            .iter()
            .rev()
            .take_while(|result| **result == last)
            .count();
        Some((last, length))
    }

    /// Streak rendered as e.g. "W2" or "OTL1"; empty before any game
    pub fn streak_label(&self) -> String {
        self.streak()
            .map(|(result, length)| format!("{}{}", result.code(), length))
            .unwrap_or_default()
    }
}
