//! Per-competitor win/loss record

use crate::stats::civilization::CivilizationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a single game ended for one competitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalResult {
    Won,
    Lost,
    Drew,
    /// No winner could be determined
    Undecided,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub games_played: u64,
    /// Games with a winning team
    pub decided_games: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub current_losing_streak: u64,
    pub max_losing_streak: u64,
    /// Summed length of the games that reported one
    #[serde(default)]
    pub total_playtime_seconds: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub civilizations: BTreeMap<String, CivilizationRecord>,
}

impl CompetitorRecord {
    pub fn observe(&mut self, result: PersonalResult) {
        self.games_played += 1;
        match result {
            PersonalResult::Won => {
                self.decided_games += 1;
                self.wins += 1;
                self.current_losing_streak = 0;
            }
            PersonalResult::Lost => {
                self.decided_games += 1;
                self.losses += 1;
                self.current_losing_streak += 1;
                self.max_losing_streak = self.max_losing_streak.max(self.current_losing_streak);
            }
            // A draw ends a losing run without counting as a win
            PersonalResult::Drew => {
                self.draws += 1;
                self.current_losing_streak = 0;
            }
            PersonalResult::Undecided => {}
        }
    }

    /// Share of decided games won, or `None` before the first decided game
    pub fn win_rate(&self) -> Option<f64> {
        if self.decided_games == 0 {
            None
        } else {
            Some(self.wins as f64 / self.decided_games as f64)
        }
    }
}
