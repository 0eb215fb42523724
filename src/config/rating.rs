//! Rating model configuration

use crate::error::RatingError;
use serde::{Deserialize, Serialize};

/// Parameters of the Gaussian skill model
///
/// The same value must drive both the rating engine and the match quality
/// estimator, otherwise balance suggestions and rating updates disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Prior mean for a new competitor (μ0)
    pub initial_mean: f64,
    /// Prior standard deviation for a new competitor (σ0)
    pub initial_stddev: f64,
    /// Per-game performance noise (β)
    pub beta: f64,
    /// Skill drift added between games (τ)
    pub tau: f64,
    /// Probability that a game between equals ends in a draw
    pub draw_probability: f64,
    /// Cosmetic multiplier for displayed ratings
    pub display_scale: f64,
    /// Games needed before a competitor stops being provisional
    pub min_games_for_ranking: u64,
    /// Down-weight members of the larger team when team sizes differ
    pub uneven_team_weighting: bool,
}

impl Default for RatingConfig {
    fn default() -> Self {
        let initial_mean = 25.0;
        let initial_stddev = initial_mean / 3.0;
        Self {
            initial_mean,
            initial_stddev,
            beta: initial_stddev / 2.0,
            tau: initial_stddev / 100.0,
            draw_probability: 0.10,
            display_scale: 40.0,
            min_games_for_ranking: 3,
            uneven_team_weighting: true,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.initial_mean.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Initial mean must be finite".to_string(),
            }
            .into());
        }

        if !(self.initial_stddev > 0.0 && self.initial_stddev.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Initial stddev must be positive".to_string(),
            }
            .into());
        }

        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Beta must be positive".to_string(),
            }
            .into());
        }

        if !(self.tau >= 0.0 && self.tau.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Tau must be non-negative".to_string(),
            }
            .into());
        }

        if !(0.0..1.0).contains(&self.draw_probability) {
            return Err(RatingError::ConfigurationError {
                message: "Draw probability must be in [0, 1)".to_string(),
            }
            .into());
        }

        if !(self.display_scale > 0.0 && self.display_scale.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Display scale must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
