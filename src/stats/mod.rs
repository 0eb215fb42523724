//! Game statistics gathered alongside the ratings
//!
//! Unlike the rating update, statistics look at every processed game,
//! including the ones the validity gate turned away.

pub mod civilization;
pub mod duration;
pub mod matchup;
pub mod record;

pub use civilization::CivilizationRecord;
pub use duration::{DurationSummary, LongestGame};
pub use matchup::{MatchupKey, MatchupLedger, MatchupResult, MatchupTally};
pub use record::{CompetitorRecord, PersonalResult};

use crate::types::{CompetitorId, GameRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct GameStatistics {
    records: HashMap<CompetitorId, CompetitorRecord>,
    matchups: MatchupLedger,
    civilizations: BTreeMap<String, CivilizationRecord>,
    durations: DurationSummary,
    total_games: u64,
}

/// One recurring pairing in a [`StatisticsSummary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub team_a: Vec<CompetitorId>,
    pub team_b: Vec<CompetitorId>,
    #[serde(flatten)]
    pub tally: MatchupTally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LosingStreak {
    pub competitor_id: CompetitorId,
    pub streak: u64,
}

/// Serializable view of everything [`GameStatistics`] has gathered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub total_games: u64,
    pub durations: DurationSummary,
    pub records: BTreeMap<CompetitorId, CompetitorRecord>,
    pub head_to_head: Vec<HeadToHead>,
    pub civilization_picks: BTreeMap<String, CivilizationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_losing_streak: Option<LosingStreak>,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one game into the records
    ///
    /// A listed competitor wins when their team is the winning team. Head to
    /// head tallies only cover two-team games with a winner or a draw.
    ///
    /// A competitor listed more than once is counted on their first listing
    /// only. Game length feeds the totals and each player's playtime.
    pub fn observe(&mut self, game: &GameRecord) {
        self.total_games += 1;

        let duration = match game.duration_seconds {
            Some(seconds) if self.durations.observe(seconds, game.timestamp) => Some(seconds),
            _ => None,
        };

        let winning_team = game
            .winning_team_id
            .filter(|id| game.team(*id).is_some());

        let mut seen = HashSet::new();
        for team in &game.teams {
            let result = match winning_team {
                Some(winner) if winner == team.team_id => PersonalResult::Won,
                Some(_) => PersonalResult::Lost,
                None if game.is_draw && game.teams.len() > 1 => PersonalResult::Drew,
                None => PersonalResult::Undecided,
            };
            for member in &team.members {
                if !seen.insert(member.as_str()) {
                    continue;
                }
                let record = self.records.entry(member.clone()).or_default();
                record.observe(result);
                if let Some(seconds) = duration {
                    record.total_playtime_seconds += seconds;
                }
                if let Some(civilization) = team.civilization(member) {
                    record
                        .civilizations
                        .entry(civilization.to_string())
                        .or_default()
                        .observe(result);
                    self.civilizations
                        .entry(civilization.to_string())
                        .or_default()
                        .observe(result);
                }
            }
        }

        if let [first, second] = game.teams.as_slice() {
            if first.members.is_empty() || second.members.is_empty() {
                return;
            }
            let result = match winning_team {
                Some(winner) if winner == first.team_id => Some(MatchupResult::FirstWins),
                Some(_) => Some(MatchupResult::SecondWins),
                None if game.is_draw => Some(MatchupResult::Draw),
                None => None,
            };
            if let Some(result) = result {
                self.matchups.record(&first.members, &second.members, result);
            }
        }
    }

    pub fn record(&self, competitor_id: &str) -> Option<&CompetitorRecord> {
        self.records.get(competitor_id)
    }

    pub fn records(&self) -> &HashMap<CompetitorId, CompetitorRecord> {
        &self.records
    }

    pub fn matchups(&self) -> &MatchupLedger {
        &self.matchups
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    pub fn durations(&self) -> &DurationSummary {
        &self.durations
    }

    /// Picks and results per civilization across all players
    pub fn civilizations(&self) -> &BTreeMap<String, CivilizationRecord> {
        &self.civilizations
    }

    /// Competitor with the longest losing streak, ties broken by name
    pub fn longest_losing_streak(&self) -> Option<(&CompetitorId, u64)> {
        self.records
            .iter()
            .filter(|(_, record)| record.max_losing_streak > 0)
            .max_by(|a, b| {
                a.1.max_losing_streak
                    .cmp(&b.1.max_losing_streak)
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(id, record)| (id, record.max_losing_streak))
    }

    pub fn summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            total_games: self.total_games,
            durations: self.durations.clone(),
            records: self
                .records
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect(),
            head_to_head: self
                .matchups
                .iter()
                .map(|((team_a, team_b), tally)| HeadToHead {
                    team_a: team_a.clone(),
                    team_b: team_b.clone(),
                    tally: tally.clone(),
                })
                .collect(),
            civilization_picks: self.civilizations.clone(),
            longest_losing_streak: self.longest_losing_streak().map(|(id, streak)| {
                LosingStreak {
                    competitor_id: id.clone(),
                    streak,
                }
            }),
        }
    }
}
