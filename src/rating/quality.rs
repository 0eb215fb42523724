//! Match quality estimation
//!
//! Quality is the draw probability of a game between two teams relative to
//! the draw probability of a perfectly even game, so it lives in [0, 1] and
//! is highest for evenly matched, well-known teams.

use crate::config::RatingConfig;
use crate::types::Belief;
use skillratings::trueskill::{match_quality_two_teams, TrueSkillConfig, TrueSkillRating};

/// Pure estimator for the balance of a two-team game
#[derive(Debug, Clone, Copy)]
pub struct MatchQualityEstimator {
    config: TrueSkillConfig,
}

impl MatchQualityEstimator {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            config: TrueSkillConfig {
                draw_probability: config.draw_probability,
                beta: config.beta,
                default_dynamics: config.tau,
            },
        }
    }

    /// Quality of a game between `team_a` and `team_b`
    ///
    /// Symmetric in its arguments. Returns 0.0 if either team is empty.
    pub fn quality(&self, team_a: &[Belief], team_b: &[Belief]) -> f64 {
        if team_a.is_empty() || team_b.is_empty() {
            return 0.0;
        }

        let team_a: Vec<TrueSkillRating> = team_a.iter().map(|&belief| belief.into()).collect();
        let team_b: Vec<TrueSkillRating> = team_b.iter().map(|&belief| belief.into()).collect();
        match_quality_two_teams(&team_a, &team_b, &self.config)
    }
}
