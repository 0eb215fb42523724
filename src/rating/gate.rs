//! Game validity gate
//!
//! Decides whether a parsed game can feed the rating update. Rejected games
//! are still real games: the engine counts them as played for every listed
//! competitor, it just leaves their beliefs alone.

use crate::rating::update::TwoTeamOutcome;
use crate::types::{CompetitorId, GameRecord, TeamRoster};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Why a game was not rated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooManyTeams,
    TooFewTeams,
    NoClearWinner,
    EmptyTeam,
    UnrecognizedParticipant,
    DuplicateParticipant,
}

impl SkipReason {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooManyTeams => "too_many_teams",
            SkipReason::TooFewTeams => "too_few_teams",
            SkipReason::NoClearWinner => "no_clear_winner",
            SkipReason::EmptyTeam => "empty_team",
            SkipReason::UnrecognizedParticipant => "unrecognized_participant",
            SkipReason::DuplicateParticipant => "duplicate_participant",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Two non-empty teams and a determinable result
    Ratable(TwoTeamOutcome),
    Skipped(SkipReason),
}

impl Classification {
    pub fn is_ratable(&self) -> bool {
        matches!(self, Classification::Ratable(_))
    }
}

/// Pure classifier for incoming game records
#[derive(Debug, Clone, Default)]
pub struct GameValidityGate {
    known_competitors: Option<HashSet<CompetitorId>>,
}

impl GameValidityGate {
    /// Gate that recognizes every non-empty competitor id
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate that only recognizes the given canonical competitors
    pub fn with_known_competitors<I>(known: I) -> Self
    where
        I: IntoIterator<Item = CompetitorId>,
    {
        Self {
            known_competitors: Some(known.into_iter().collect()),
        }
    }

    pub fn is_recognized(&self, competitor_id: &str) -> bool {
        if competitor_id.trim().is_empty() {
            return false;
        }
        match &self.known_competitors {
            Some(known) => known.contains(competitor_id),
            None => true,
        }
    }

    /// Classify a game as ratable or skipped
    ///
    /// For a ratable game the outcome is expressed relative to the order of
    /// `game.teams`: the first listed team is "first".
    pub fn classify(&self, game: &GameRecord) -> Classification {
        match game.teams.len() {
            0 | 1 => return Classification::Skipped(SkipReason::TooFewTeams),
            2 => {}
            _ => return Classification::Skipped(SkipReason::TooManyTeams),
        }

        if game.teams.iter().any(|team| team.members.is_empty()) {
            return Classification::Skipped(SkipReason::EmptyTeam);
        }

        let mut seen = HashSet::new();
        if !game.participants().all(|id| seen.insert(id.as_str())) {
            return Classification::Skipped(SkipReason::DuplicateParticipant);
        }

        if !game.participants().all(|id| self.is_recognized(id)) {
            return Classification::Skipped(SkipReason::UnrecognizedParticipant);
        }

        match Self::outcome(&game.teams[0], &game.teams[1], game) {
            Some(outcome) => Classification::Ratable(outcome),
            None => Classification::Skipped(SkipReason::NoClearWinner),
        }
    }

    fn outcome(first: &TeamRoster, second: &TeamRoster, game: &GameRecord) -> Option<TwoTeamOutcome> {
        // Both teams sharing an id would make the winner ambiguous
        if first.team_id == second.team_id {
            return None;
        }
        match (game.winning_team_id, game.is_draw) {
            (None, true) => Some(TwoTeamOutcome::Draw),
            (Some(winner), false) if winner == first.team_id => Some(TwoTeamOutcome::FirstWins),
            (Some(winner), false) if winner == second.team_id => Some(TwoTeamOutcome::SecondWins),
            _ => None,
        }
    }
}
