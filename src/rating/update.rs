//! Closed-form Bayesian update for a single two-team game
//!
//! Each competitor contributes a performance drawn from N(mean, stddev² + β²).
//! A team's performance is the weighted sum of its members' performances and
//! the result observes the sign (or, for a draw, the smallness) of the
//! difference between the two team performances.

use crate::config::RatingConfig;
use crate::rating::gaussian::{draw_margin, v_draw, v_win, w_draw, w_win};
use crate::types::Belief;

/// Floor applied when a posterior variance would collapse through rounding
pub const MIN_VARIANCE: f64 = 1e-9;

/// Result of a two-team game from the perspective of the first team passed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoTeamOutcome {
    FirstWins,
    SecondWins,
    Draw,
}

/// Posterior beliefs for both teams, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct TwoTeamPosterior {
    pub first: Vec<Belief>,
    pub second: Vec<Belief>,
    /// Number of variances raised to [`MIN_VARIANCE`]
    pub clamped_variances: u32,
}

/// Per-member weights for each team
///
/// With uneven weighting enabled, every member of the larger team counts
/// `n_small / n_large`, so both sides enter the model with the same
/// effective head count. Members of the smaller team keep weight 1.
pub fn team_weights(first_size: usize, second_size: usize, uneven_team_weighting: bool) -> (f64, f64) {
    if !uneven_team_weighting || first_size == second_size || first_size == 0 || second_size == 0 {
        return (1.0, 1.0);
    }
    let small = first_size.min(second_size) as f64;
    let large = first_size.max(second_size) as f64;
    if first_size > second_size {
        (small / large, 1.0)
    } else {
        (1.0, small / large)
    }
}

/// Apply one game's result to the participants' beliefs
///
/// Neither team may be empty; the caller is expected to have run the game
/// through the validity gate first.
pub fn rate_two_teams(
    config: &RatingConfig,
    first: &[Belief],
    second: &[Belief],
    outcome: TwoTeamOutcome,
) -> TwoTeamPosterior {
    debug_assert!(!first.is_empty() && !second.is_empty());

    let beta_sq = config.beta * config.beta;
    let (first_weight, second_weight) =
        team_weights(first.len(), second.len(), config.uneven_team_weighting);

    let team_mean = |team: &[Belief], weight: f64| team.iter().map(|b| weight * b.mean).sum::<f64>();
    let team_variance = |team: &[Belief], weight: f64| {
        team.iter()
            .map(|b| weight * weight * (b.variance() + beta_sq))
            .sum::<f64>()
    };

    let c_sq = team_variance(first, first_weight) + team_variance(second, second_weight);
    let c = c_sq.sqrt();

    let total_players = first.len() + second.len();
    let epsilon = draw_margin(config.draw_probability, config.beta, total_players) / c;

    let first_mean = team_mean(first, first_weight);
    let second_mean = team_mean(second, second_weight);

    // Corrections are expressed for the first team; `sign` flips them when the
    // second team is the observed winner.
    let (v, w, sign) = match outcome {
        TwoTeamOutcome::FirstWins => {
            let t = (first_mean - second_mean) / c;
            (v_win(t, epsilon), w_win(t, epsilon), 1.0)
        }
        TwoTeamOutcome::SecondWins => {
            let t = (second_mean - first_mean) / c;
            (v_win(t, epsilon), w_win(t, epsilon), -1.0)
        }
        TwoTeamOutcome::Draw => {
            let t = (first_mean - second_mean) / c;
            (v_draw(t, epsilon), w_draw(t, epsilon), 1.0)
        }
    };

    let mut clamped_variances = 0;
    let mut update = |belief: &Belief, weight: f64, direction: f64| {
        let variance = belief.variance();
        let mean = belief.mean + direction * weight * (variance / c) * v;

        let mut posterior_variance = variance * (1.0 - weight * weight * (variance / c_sq) * w);
        if posterior_variance.is_nan() || posterior_variance < MIN_VARIANCE {
            clamped_variances += 1;
            posterior_variance = MIN_VARIANCE;
        }
        posterior_variance += config.tau * config.tau;

        Belief::new(mean, posterior_variance.sqrt())
    };

    let first: Vec<Belief> = first
        .iter()
        .map(|belief| update(belief, first_weight, sign))
        .collect();
    let second: Vec<Belief> = second
        .iter()
        .map(|belief| update(belief, second_weight, -sign))
        .collect();

    TwoTeamPosterior {
        first,
        second,
        clamped_variances,
    }
}
