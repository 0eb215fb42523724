//! Head-to-head tallies between recurring team line-ups

use crate::types::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Two sorted rosters, ordered so the same pairing always maps to one key
pub type MatchupKey = (Vec<CompetitorId>, Vec<CompetitorId>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchupTally {
    pub wins_a: u64,
    pub wins_b: u64,
    pub draws: u64,
}

impl MatchupTally {
    pub fn decided_games(&self) -> u64 {
        self.wins_a + self.wins_b
    }

    /// |wins_a - wins_b| / decided; 0 is a perfectly even rivalry
    pub fn imbalance(&self) -> f64 {
        let decided = self.decided_games();
        if decided == 0 {
            return 0.0;
        }
        self.wins_a.abs_diff(self.wins_b) as f64 / decided as f64
    }
}

/// Which side of a canonical pairing won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupResult {
    /// The team given first won
    FirstWins,
    SecondWins,
    Draw,
}

#[derive(Debug, Clone, Default)]
pub struct MatchupLedger {
    tallies: BTreeMap<MatchupKey, MatchupTally>,
}

impl MatchupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical key for two rosters plus whether their order was swapped
    pub fn key(first: &[CompetitorId], second: &[CompetitorId]) -> (MatchupKey, bool) {
        let mut first = first.to_vec();
        let mut second = second.to_vec();
        first.sort();
        second.sort();
        if first <= second {
            ((first, second), false)
        } else {
            ((second, first), true)
        }
    }

    pub fn record(&mut self, first: &[CompetitorId], second: &[CompetitorId], result: MatchupResult) {
        let (key, swapped) = Self::key(first, second);
        let tally = self.tallies.entry(key).or_default();
        match (result, swapped) {
            (MatchupResult::Draw, _) => tally.draws += 1,
            (MatchupResult::FirstWins, false) | (MatchupResult::SecondWins, true) => tally.wins_a += 1,
            (MatchupResult::FirstWins, true) | (MatchupResult::SecondWins, false) => tally.wins_b += 1,
        }
    }

    pub fn get(&self, first: &[CompetitorId], second: &[CompetitorId]) -> Option<&MatchupTally> {
        let (key, _) = Self::key(first, second);
        self.tallies.get(&key)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MatchupKey, &MatchupTally)> {
        self.tallies.iter()
    }

    /// Pairings with at least `min_games` decided games, most even first
    ///
    /// Ties on balance go to the pairing with more decided games.
    pub fn most_contested(&self, min_games: u64) -> Vec<(&MatchupKey, &MatchupTally)> {
        let mut contested: Vec<_> = self
            .tallies
            .iter()
            .filter(|(_, tally)| tally.decided_games() >= min_games)
            .collect();
        contested.sort_by(|a, b| {
            a.1.imbalance()
                .total_cmp(&b.1.imbalance())
                .then_with(|| b.1.decided_games().cmp(&a.1.decided_games()))
        });
        contested
    }
}
