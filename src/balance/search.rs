//! Exhaustive search for the most balanced two-team split of a roster

use crate::balance::partition::{canonical_masks, full_mask, is_canonical, split};
use crate::config::{BalanceConfig, RatingConfig};
use crate::error::RatingError;
use crate::metrics::{MetricsTimer, RatingMetrics};
use crate::rating::quality::MatchQualityEstimator;
use crate::rating::update::{rate_two_teams, TwoTeamOutcome};
use crate::rating::RatingEngine;
use crate::types::{Belief, CompetitorId, Matchup, ProjectedDelta};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable copy of the beliefs a search needs
///
/// Taken once from the engine; scoring and projection only ever read it.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSnapshot {
    config: RatingConfig,
    members: Vec<CompetitorId>,
    beliefs: Vec<Belief>,
    games_played: Vec<u64>,
}

impl RosterSnapshot {
    pub fn members(&self) -> &[CompetitorId] {
        &self.members
    }

    pub fn beliefs(&self) -> &[Belief] {
        &self.beliefs
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn team_beliefs(&self, indices: &[usize]) -> Vec<Belief> {
        indices.iter().map(|&index| self.beliefs[index]).collect()
    }

    fn team_games(&self, indices: &[usize]) -> u64 {
        indices.iter().map(|&index| self.games_played[index]).sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct ScoredPartition {
    mask: u32,
    quality: f64,
    /// Games played by the less experienced of the two teams
    established: u64,
}

pub struct TeamBalanceSearch {
    config: BalanceConfig,
    metrics: Option<Arc<RatingMetrics>>,
}

impl TeamBalanceSearch {
    pub fn new(config: BalanceConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<RatingMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Copy the roster's beliefs out of the engine
    ///
    /// The roster is de-duplicated and sorted. Every competitor must already
    /// have a belief; the search never registers new competitors.
    pub fn snapshot<S: AsRef<str>>(
        &self,
        engine: &RatingEngine,
        roster: &[S],
    ) -> crate::error::Result<RosterSnapshot> {
        let mut members: Vec<CompetitorId> = roster.iter().map(|id| id.as_ref().to_string()).collect();
        members.sort();
        members.dedup();

        if members.len() < 2 {
            return Err(RatingError::InsufficientRoster {
                size: members.len(),
            }
            .into());
        }
        if members.len() > self.config.max_roster_size {
            return Err(RatingError::RosterTooLarge {
                size: members.len(),
                max: self.config.max_roster_size,
            }
            .into());
        }

        let mut beliefs = Vec::with_capacity(members.len());
        let mut games_played = Vec::with_capacity(members.len());
        for competitor_id in &members {
            let belief = engine
                .belief(competitor_id)
                .ok_or_else(|| RatingError::UnknownCompetitor {
                    competitor_id: competitor_id.clone(),
                })?;
            beliefs.push(belief);
            games_played.push(engine.games_played(competitor_id));
        }

        Ok(RosterSnapshot {
            config: engine.config().clone(),
            members,
            beliefs,
            games_played,
        })
    }

    /// Best `top_n` splits of `roster`, most balanced first
    ///
    /// Considers all `2^(N-1) - 1` canonical partitions. The engine is only
    /// read; projected deltas come from simulated updates on copies.
    pub fn find_top_balanced<S: AsRef<str>>(
        &self,
        engine: &RatingEngine,
        roster: &[S],
        top_n: usize,
    ) -> crate::error::Result<Vec<Matchup>> {
        let snapshot = self.snapshot(engine, roster)?;
        Ok(self.rank(&snapshot, top_n))
    }

    /// Score every canonical partition of a snapshot and keep the best
    pub fn rank(&self, snapshot: &RosterSnapshot, top_n: usize) -> Vec<Matchup> {
        let timer = MetricsTimer::start();
        let estimator = MatchQualityEstimator::new(&snapshot.config);
        let roster_size = snapshot.len();

        let score = |mask: u32| {
            let (team_a, team_b) = split(mask, roster_size);
            let quality =
                estimator.quality(&snapshot.team_beliefs(&team_a), &snapshot.team_beliefs(&team_b));
            ScoredPartition {
                mask,
                quality,
                established: snapshot.team_games(&team_a).min(snapshot.team_games(&team_b)),
            }
        };

        let mut scored: Vec<ScoredPartition> = if self.config.parallel {
            // Snapshots never exceed MAX_ROSTER_SIZE, so the mask exists
            let end = full_mask(roster_size).unwrap_or(1);
            (1..end)
                .into_par_iter()
                .filter(|mask| is_canonical(*mask, roster_size))
                .map(score)
                .collect()
        } else {
            canonical_masks(roster_size).map(score).collect()
        };
        let evaluated = scored.len() as u64;

        scored.sort_by(|a, b| {
            b.quality
                .total_cmp(&a.quality)
                .then_with(|| b.established.cmp(&a.established))
                .then_with(|| a.mask.cmp(&b.mask))
        });
        scored.truncate(top_n);

        let matchups: Vec<Matchup> = scored
            .iter()
            .map(|candidate| self.project(snapshot, candidate))
            .collect();

        let elapsed = timer.stop();
        debug!(
            roster_size,
            partitions = evaluated,
            returned = matchups.len(),
            best_quality = matchups.first().map(|m| m.quality),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Balance search finished"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_balance_search(evaluated, elapsed);
        }

        matchups
    }

    fn project(&self, snapshot: &RosterSnapshot, candidate: &ScoredPartition) -> Matchup {
        let (team_a, team_b) = split(candidate.mask, snapshot.len());
        let beliefs_a = snapshot.team_beliefs(&team_a);
        let beliefs_b = snapshot.team_beliefs(&team_b);

        let a_wins = rate_two_teams(&snapshot.config, &beliefs_a, &beliefs_b, TwoTeamOutcome::FirstWins);
        let b_wins = rate_two_teams(&snapshot.config, &beliefs_a, &beliefs_b, TwoTeamOutcome::SecondWins);

        let mut projected_deltas = BTreeMap::new();
        let sides = [
            (&team_a, &beliefs_a, &a_wins.first, &b_wins.first),
            (&team_b, &beliefs_b, &a_wins.second, &b_wins.second),
        ];
        for (indices, before, on_a_win, on_b_win) in sides {
            for (slot, &index) in indices.iter().enumerate() {
                projected_deltas.insert(
                    snapshot.members[index].clone(),
                    ProjectedDelta {
                        on_a_win: on_a_win[slot].mean - before[slot].mean,
                        on_b_win: on_b_win[slot].mean - before[slot].mean,
                    },
                );
            }
        }

        let names = |indices: &[usize]| -> Vec<CompetitorId> {
            indices
                .iter()
                .map(|&index| snapshot.members[index].clone())
                .collect()
        };

        Matchup {
            quality: candidate.quality,
            team_a: names(&team_a[..]),
            team_b: names(&team_b[..]),
            projected_deltas,
        }
    }
}
