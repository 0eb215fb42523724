//! Sequential rating engine
//!
//! Owns every competitor's belief and games-played counter. Games must be fed
//! in chronological order: each update starts from the beliefs left by all
//! earlier games, so reordering the input changes the result.

use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::metrics::{MetricsTimer, RatingMetrics};
use crate::rating::gate::{Classification, GameValidityGate, SkipReason};
use crate::rating::history::HistoryRecorder;
use crate::rating::update::{rate_two_teams, TwoTeamOutcome};
use crate::stats::GameStatistics;
use crate::types::{Belief, CompetitorId, CompetitorStanding, GameRecord, RatingUpdate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Numeric health counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Posterior variances raised to the floor
    pub variance_clamps: u64,
    /// Games whose timestamp was earlier than the previous game's
    pub out_of_order_games: u64,
}

/// What happened to one processed game
#[derive(Debug, Clone, PartialEq)]
pub enum GameProcessing {
    Rated {
        sequence_number: u64,
        updates: Vec<RatingUpdate>,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl GameProcessing {
    pub fn is_rated(&self) -> bool {
        matches!(self, GameProcessing::Rated { .. })
    }
}

pub struct RatingEngine {
    config: RatingConfig,
    gate: GameValidityGate,
    beliefs: HashMap<CompetitorId, Belief>,
    games_played: HashMap<CompetitorId, u64>,
    history: HistoryRecorder,
    statistics: GameStatistics,
    rated_games: u64,
    last_timestamp: Option<DateTime<Utc>>,
    diagnostics: Diagnostics,
    metrics: Option<Arc<RatingMetrics>>,
}

impl RatingEngine {
    /// Create an engine with an open gate (every competitor recognized)
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        Self::with_gate(config, GameValidityGate::new())
    }

    pub fn with_gate(config: RatingConfig, gate: GameValidityGate) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            gate,
            beliefs: HashMap::new(),
            games_played: HashMap::new(),
            history: HistoryRecorder::new(),
            statistics: GameStatistics::new(),
            rated_games: 0,
            last_timestamp: None,
            diagnostics: Diagnostics::default(),
            metrics: None,
        })
    }

    /// Report processing counters to a Prometheus collector
    pub fn with_metrics(mut self, metrics: Arc<RatingMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn gate(&self) -> &GameValidityGate {
        &self.gate
    }

    /// Prior belief for a competitor nobody has rated yet
    pub fn prior(&self) -> Belief {
        Belief::new(self.config.initial_mean, self.config.initial_stddev)
    }

    /// Current belief, registering the prior on first reference
    pub fn get_or_create(&mut self, competitor_id: &str) -> Belief {
        let prior = self.prior();
        *self
            .beliefs
            .entry(competitor_id.to_string())
            .or_insert(prior)
    }

    /// Current belief without registering anything
    pub fn belief(&self, competitor_id: &str) -> Option<Belief> {
        self.beliefs.get(competitor_id).copied()
    }

    pub fn beliefs(&self) -> &HashMap<CompetitorId, Belief> {
        &self.beliefs
    }

    /// Count a game as played, whether or not it gets rated
    pub fn record_participation(&mut self, competitor_id: &str) {
        *self
            .games_played
            .entry(competitor_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn games_played(&self, competitor_id: &str) -> u64 {
        self.games_played.get(competitor_id).copied().unwrap_or(0)
    }

    /// Number of games that have gone through the rating update
    pub fn rated_games(&self) -> u64 {
        self.rated_games
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Classify, count and, when possible, rate one game
    pub fn process_game(&mut self, game: &GameRecord) -> crate::error::Result<GameProcessing> {
        if let Some(previous) = self.last_timestamp {
            if game.timestamp < previous {
                self.diagnostics.out_of_order_games += 1;
                warn!(
                    timestamp = %game.timestamp,
                    previous = %previous,
                    "Game arrived out of chronological order"
                );
            }
        }
        self.last_timestamp = Some(
            self.last_timestamp
                .map_or(game.timestamp, |previous| previous.max(game.timestamp)),
        );

        // A competitor listed twice still played one game
        let mut seen = HashSet::new();
        let participants: Vec<CompetitorId> = game
            .participants()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();
        for competitor_id in &participants {
            self.record_participation(competitor_id);
        }
        self.statistics.observe(game);

        match self.gate.classify(game) {
            Classification::Skipped(reason) => {
                info!(
                    reason = %reason,
                    participants = participants.len(),
                    "Game skipped for rating"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_skipped_game(reason);
                }
                Ok(GameProcessing::Skipped { reason })
            }
            Classification::Ratable(_) => {
                let updates = self.apply_game_result(game)?;
                Ok(GameProcessing::Rated {
                    sequence_number: self.rated_games,
                    updates,
                })
            }
        }
    }

    /// Run the Bayesian update for one game the gate accepts
    ///
    /// Does not touch games-played counters. A game the gate rejects is
    /// refused with [`RatingError::UnratableGame`].
    pub fn apply_game_result(&mut self, game: &GameRecord) -> crate::error::Result<Vec<RatingUpdate>> {
        let outcome = match self.gate.classify(game) {
            Classification::Ratable(outcome) => outcome,
            Classification::Skipped(reason) => {
                return Err(RatingError::UnratableGame { reason }.into());
            }
        };
        let timer = MetricsTimer::start();

        let first_ids = &game.teams[0].members;
        let second_ids = &game.teams[1].members;
        let first: Vec<Belief> = first_ids.iter().map(|id| self.get_or_create(id)).collect();
        let second: Vec<Belief> = second_ids.iter().map(|id| self.get_or_create(id)).collect();

        let posterior = rate_two_teams(&self.config, &first, &second, outcome);
        if posterior.clamped_variances > 0 {
            self.diagnostics.variance_clamps += u64::from(posterior.clamped_variances);
            warn!(
                clamped = posterior.clamped_variances,
                "Posterior variance hit the numeric floor"
            );
        }

        self.rated_games += 1;
        let sequence_number = self.rated_games;

        let old = first.iter().chain(second.iter());
        let new = posterior.first.iter().chain(posterior.second.iter());
        let ids = first_ids.iter().chain(second_ids.iter());

        let mut updates = Vec::with_capacity(first_ids.len() + second_ids.len());
        for ((competitor_id, old_belief), new_belief) in ids.zip(old).zip(new) {
            debug!(
                competitor = %competitor_id,
                sequence_number,
                old_mean = old_belief.mean,
                new_mean = new_belief.mean,
                new_stddev = new_belief.stddev,
                "Rating updated"
            );
            self.beliefs.insert(competitor_id.clone(), *new_belief);
            self.history.record(sequence_number, competitor_id, *new_belief);
            updates.push(RatingUpdate {
                competitor_id: competitor_id.clone(),
                old_belief: *old_belief,
                new_belief: *new_belief,
            });
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_rated_game(timer.stop(), posterior.clamped_variances);
        }

        Ok(updates)
    }

    /// Public view of one competitor, if they have a belief
    pub fn standing(&self, competitor_id: &str) -> Option<CompetitorStanding> {
        let belief = self.belief(competitor_id)?;
        Some(self.build_standing(competitor_id, belief))
    }

    /// Every rated competitor, strongest mean first
    pub fn standings(&self) -> Vec<CompetitorStanding> {
        let mut standings: Vec<CompetitorStanding> = self
            .beliefs
            .iter()
            .map(|(id, belief)| self.build_standing(id, *belief))
            .collect();
        standings.sort_by(|a, b| {
            b.mean
                .total_cmp(&a.mean)
                .then_with(|| a.competitor_id.cmp(&b.competitor_id))
        });
        standings
    }

    /// Competitors with enough games to leave provisional status
    pub fn ranked_standings(&self) -> Vec<CompetitorStanding> {
        self.standings()
            .into_iter()
            .filter(|standing| !standing.provisional)
            .collect()
    }

    /// Restore a competitor from a stored standing
    ///
    /// Only the unscaled values are read back; scaled fields are derived.
    pub fn seed(&mut self, standing: &CompetitorStanding) -> crate::error::Result<()> {
        if !standing.mean.is_finite() || !standing.stddev.is_finite() || standing.stddev < 0.0 {
            return Err(RatingError::InvalidStanding {
                competitor_id: standing.competitor_id.clone(),
            }
            .into());
        }
        self.beliefs
            .insert(standing.competitor_id.clone(), standing.belief());
        self.games_played
            .insert(standing.competitor_id.clone(), standing.games_played);
        Ok(())
    }

    fn build_standing(&self, competitor_id: &str, belief: Belief) -> CompetitorStanding {
        let games_played = self.games_played(competitor_id);
        CompetitorStanding {
            competitor_id: competitor_id.to_string(),
            mean: belief.mean,
            stddev: belief.stddev,
            mean_scaled: belief.scaled_mean(self.config.display_scale),
            stddev_scaled: belief.scaled_stddev(self.config.display_scale),
            games_played,
            confidence_percent: belief.confidence_percent(self.config.initial_stddev),
            provisional: games_played < self.config.min_games_for_ranking,
        }
    }

    /// Beliefs of a two-team game under a hypothetical outcome, without
    /// touching engine state
    pub fn preview(
        &self,
        first: &[Belief],
        second: &[Belief],
        outcome: TwoTeamOutcome,
    ) -> (Vec<Belief>, Vec<Belief>) {
        let posterior = rate_two_teams(&self.config, first, second, outcome);
        (posterior.first, posterior.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TeamRoster;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn duel(winner: &str, loser: &str, minutes: i64) -> GameRecord {
        GameRecord::decisive(
            vec![TeamRoster::new(1, [winner]), TeamRoster::new(2, [loser])],
            1,
            at(minutes),
        )
    }

    fn engine() -> RatingEngine {
        RatingEngine::new(RatingConfig::default()).unwrap()
    }

    #[test]
    fn test_get_or_create_registers_prior() {
        let mut engine = engine();
        assert!(engine.belief("alice").is_none());

        let belief = engine.get_or_create("alice");
        assert_eq!(belief, engine.prior());
        assert_eq!(engine.belief("alice"), Some(belief));
        assert_eq!(engine.games_played("alice"), 0);
    }

    #[test]
    fn test_process_decisive_game() {
        let mut engine = engine();
        let result = engine.process_game(&duel("alice", "bob", 0)).unwrap();

        match result {
            GameProcessing::Rated {
                sequence_number,
                updates,
            } => {
                assert_eq!(sequence_number, 1);
                assert_eq!(updates.len(), 2);
                assert!(updates[0].mean_delta() > 0.0);
                assert!(updates[1].mean_delta() < 0.0);
            }
            other => panic!("expected a rated game, got {other:?}"),
        }

        assert_eq!(engine.games_played("alice"), 1);
        assert_eq!(engine.rated_games(), 1);
        assert_eq!(engine.history().len(), 2);
        assert!(engine.belief("alice").unwrap().mean > engine.belief("bob").unwrap().mean);
    }

    #[test]
    fn test_skipped_game_counts_participation_only() {
        let mut engine = engine();
        let game = GameRecord::decisive(
            vec![
                TeamRoster::new(1, ["alice"]),
                TeamRoster::new(2, ["bob"]),
                TeamRoster::new(3, ["carol"]),
            ],
            1,
            at(0),
        );

        let result = engine.process_game(&game).unwrap();
        assert_eq!(
            result,
            GameProcessing::Skipped {
                reason: SkipReason::TooManyTeams
            }
        );
        for name in ["alice", "bob", "carol"] {
            assert_eq!(engine.games_played(name), 1);
            assert!(engine.belief(name).is_none());
        }
        assert_eq!(engine.rated_games(), 0);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_apply_rejects_unratable_game() {
        let mut engine = engine();
        let mut game = duel("alice", "bob", 0);
        game.winning_team_id = None;

        let error = engine.apply_game_result(&game).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RatingError>(),
            Some(&RatingError::UnratableGame {
                reason: SkipReason::NoClearWinner
            })
        );
        assert!(engine.beliefs().is_empty());
    }

    #[test]
    fn test_sequence_numbers_advance_per_rated_game() {
        let mut engine = engine();
        engine.process_game(&duel("alice", "bob", 0)).unwrap();
        let mut skipped = duel("alice", "bob", 1);
        skipped.winning_team_id = None;
        engine.process_game(&skipped).unwrap();
        engine.process_game(&duel("bob", "alice", 2)).unwrap();

        let sequence: Vec<u64> = engine
            .history()
            .for_competitor("alice")
            .map(|s| s.sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2]);
        assert_eq!(engine.games_played("alice"), 3);
    }

    #[test]
    fn test_out_of_order_timestamps_are_counted() {
        let mut engine = engine();
        engine.process_game(&duel("alice", "bob", 10)).unwrap();
        engine.process_game(&duel("alice", "bob", 5)).unwrap();
        assert_eq!(engine.diagnostics().out_of_order_games, 1);
    }

    #[test]
    fn test_standings_and_provisional_flag() {
        let mut engine = engine();
        for minute in 0..3 {
            engine.process_game(&duel("alice", "bob", minute)).unwrap();
        }
        engine.process_game(&duel("alice", "carol", 3)).unwrap();

        let standings = engine.standings();
        assert_eq!(standings[0].competitor_id, "alice");
        assert_eq!(standings[0].games_played, 4);
        assert!(!standings[0].provisional);
        assert!((standings[0].mean_scaled - standings[0].mean * 40.0).abs() < 1e-9);
        assert!(standings[0].confidence_percent > 0.0);

        let carol = engine.standing("carol").unwrap();
        assert!(carol.provisional);

        let ranked: Vec<String> = engine
            .ranked_standings()
            .into_iter()
            .map(|s| s.competitor_id)
            .collect();
        assert_eq!(ranked, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_seed_round_trips_standing() {
        let mut source = engine();
        source.process_game(&duel("alice", "bob", 0)).unwrap();
        let stored = serde_json::to_string(&source.standings()).unwrap();

        let restored: Vec<CompetitorStanding> = serde_json::from_str(&stored).unwrap();
        let mut target = engine();
        for standing in &restored {
            target.seed(standing).unwrap();
        }

        assert_eq!(target.belief("alice"), source.belief("alice"));
        assert_eq!(target.games_played("bob"), 1);
        assert_eq!(target.standings(), source.standings());
    }

    #[test]
    fn test_seed_rejects_negative_stddev() {
        let mut source = engine();
        source.get_or_create("alice");
        let mut standing = source.standing("alice").unwrap();
        standing.stddev = -1.0;

        let mut target = engine();
        let error = target.seed(&standing).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RatingError>(),
            Some(&RatingError::InvalidStanding {
                competitor_id: "alice".to_string()
            })
        );
        assert!(target.belief("alice").is_none());
    }

    #[test]
    fn test_metrics_are_recorded() {
        let metrics = Arc::new(RatingMetrics::new().unwrap());
        let mut engine = engine().with_metrics(metrics.clone());

        engine.process_game(&duel("alice", "bob", 0)).unwrap();
        let mut undecided = duel("alice", "bob", 1);
        undecided.winning_team_id = None;
        engine.process_game(&undecided).unwrap();

        assert_eq!(metrics.games_processed_total.with_label_values(&["rated"]).get(), 1);
        assert_eq!(
            metrics
                .games_skipped_total
                .with_label_values(&["no_clear_winner"])
                .get(),
            1
        );
        assert_eq!(metrics.rating_update_duration.get_sample_count(), 1);
    }

    #[test]
    fn test_duplicate_listing_counts_one_game() {
        let mut engine = engine();
        let game = GameRecord::decisive(
            vec![
                TeamRoster::new(1, ["alice", "bob"]),
                TeamRoster::new(2, ["bob"]),
            ],
            1,
            at(0),
        );

        let result = engine.process_game(&game).unwrap();
        assert_eq!(
            result,
            GameProcessing::Skipped {
                reason: SkipReason::DuplicateParticipant
            }
        );
        assert_eq!(engine.games_played("alice"), 1);
        assert_eq!(engine.games_played("bob"), 1);
        assert_eq!(engine.statistics().record("bob").unwrap().games_played, 1);
        assert_eq!(engine.statistics().record("alice").unwrap().games_played, 1);
    }

    #[test]
    fn test_preview_leaves_state_untouched() {
        let mut engine = engine();
        let alice = engine.get_or_create("alice");
        let bob = engine.get_or_create("bob");

        let (first, second) = engine.preview(&[alice], &[bob], TwoTeamOutcome::FirstWins);
        assert!(first[0].mean > alice.mean);
        assert!(second[0].mean < bob.mean);
        assert_eq!(engine.belief("alice"), Some(alice));
    }
}
