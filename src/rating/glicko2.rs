//! Glicko-2 rating system implementation
//!
//! Each completed match is treated as its own rating period against a single
//! opponent. Ratings are stored on the public scale (mean around 1500) and
//! converted to the Glicko-2 internal scale for the update.

use crate::config::{RatingConfig, ScoreMapping};
use crate::error::{EngineError, Result};
use crate::rating::calculator::RatingCalculator;
use crate::types::RatingState;
use std::f64::consts::PI;
use tracing::trace;

/// Conversion factor between the public and the internal scale
pub const SCALE: f64 = 173.7178;

/// Public-scale rating that maps to an internal mean of zero
pub const CENTER: f64 = 1500.0;

/// Rating state on the internal scale
#[derive(Debug, Clone, Copy, PartialEq)]
struct Internal {
    mu: f64,
    phi: f64,
    sigma: f64,
}

impl From<&RatingState> for Internal {
    fn from(state: &RatingState) -> Self {
        Self {
            mu: (state.mu - CENTER) / SCALE,
            phi: state.phi / SCALE,
            sigma: state.sigma,
        }
    }
}

impl From<Internal> for RatingState {
    fn from(internal: Internal) -> Self {
        Self {
            mu: internal.mu * SCALE + CENTER,
            phi: internal.phi * SCALE,
            sigma: internal.sigma,
        }
    }
}

/// Discount applied to an opponent's influence given its deviation
pub fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
}

/// Expected score of a player with mean `mu` against an opponent (`mu_opp`, `phi_opp`)
///
/// All arguments are on the internal scale.
pub fn expectation(mu: f64, mu_opp: f64, phi_opp: f64) -> f64 {
    1.0 / (1.0 + (-g(phi_opp) * (mu - mu_opp)).exp())
}

/// Glicko-2 rating calculator
#[derive(Debug, Clone)]
pub struct Glicko2Calculator {
    config: RatingConfig,
}

impl Default for Glicko2Calculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl Glicko2Calculator {
    /// Create a new Glicko-2 calculator
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config
    }

    /// Solve for the new volatility with the Illinois variant of regula falsi
    /// over `ln(sigma^2)`
    fn new_volatility(&self, sigma: f64, phi: f64, v: f64, delta: f64) -> Result<f64> {
        let tau = self.config.tau;
        let epsilon = self.config.convergence_tolerance;
        let max_iterations = self.config.max_iterations;

        let a = (sigma * sigma).ln();
        let phi_sq = phi * phi;
        let delta_sq = delta * delta;

        let f = |x: f64| {
            let ex = x.exp();
            let denom = phi_sq + v + ex;
            ex * (delta_sq - phi_sq - v - ex) / (2.0 * denom * denom) - (x - a) / (tau * tau)
        };

        let mut lower = a;
        let mut upper = if delta_sq > phi_sq + v {
            (delta_sq - phi_sq - v).ln()
        } else {
            let mut k = 1.0;
            let mut bracketing = 0;
            while f(a - k * tau) < 0.0 {
                bracketing += 1;
                if bracketing >= max_iterations {
                    return Err(EngineError::Convergence {
                        iterations: bracketing,
                    }
                    .into());
                }
                k += 1.0;
            }
            a - k * tau
        };

        let mut f_lower = f(lower);
        let mut f_upper = f(upper);
        let mut iterations = 0;

        while (upper - lower).abs() > epsilon {
            if iterations >= max_iterations {
                return Err(EngineError::Convergence { iterations }.into());
            }
            iterations += 1;

            let candidate = lower + (lower - upper) * f_lower / (f_upper - f_lower);
            let f_candidate = f(candidate);

            if f_candidate * f_upper <= 0.0 {
                lower = upper;
                f_lower = f_upper;
            } else {
                f_lower /= 2.0;
            }

            upper = candidate;
            f_upper = f_candidate;
        }

        trace!(iterations, "volatility converged");
        Ok((lower / 2.0).exp())
    }
}

impl RatingCalculator for Glicko2Calculator {
    fn initial_rating(&self) -> RatingState {
        self.config.initial_state()
    }

    /// Win probability using the combined deviation of both teams, so that
    /// `p(a, b) + p(b, a) == 1`
    ///
    /// This is not the `E` term inside [`update`](Self::update), which
    /// discounts by the opponent's deviation alone. The two only agree when
    /// the player's deviation is zero; whenever it is not, the combined form
    /// sits closer to 0.5. Use [`expectation`] for the single-deviation odds.
    fn expected_score(&self, player: &RatingState, opponent: &RatingState) -> f64 {
        let player = Internal::from(player);
        let opponent = Internal::from(opponent);
        let combined_phi = (player.phi * player.phi + opponent.phi * opponent.phi).sqrt();

        expectation(player.mu, opponent.mu, combined_phi)
    }

    fn update(
        &self,
        player: &RatingState,
        opponent: &RatingState,
        score: f64,
    ) -> Result<RatingState> {
        if !self.config.score_mapping.accepts(score) {
            return Err(EngineError::InvalidScore { score }.into());
        }

        let me = Internal::from(player);
        let opp = Internal::from(opponent);

        let g_opp = g(opp.phi);
        let expected = expectation(me.mu, opp.mu, opp.phi);

        let v = 1.0 / (g_opp * g_opp * expected * (1.0 - expected));
        let delta = v * g_opp * (score - expected);

        let sigma = self.new_volatility(me.sigma, me.phi, v, delta)?;
        let phi_star = (me.phi * me.phi + sigma * sigma).sqrt();
        let phi = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
        let mu = me.mu + phi * phi * g_opp * (score - expected);

        Ok(Internal { mu, phi, sigma }.into())
    }

    fn score_mapping(&self) -> ScoreMapping {
        self.config.score_mapping
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: RatingConfig =
            serde_json::from_value(config).map_err(|e| EngineError::Configuration {
                message: format!("Invalid Glicko-2 configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
