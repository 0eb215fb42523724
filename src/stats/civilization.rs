//! Civilization pick and win tallies

use crate::stats::record::PersonalResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilizationRecord {
    pub picks: u64,
    /// Picks in games with a winning team
    pub decided_games: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl CivilizationRecord {
    pub fn observe(&mut self, result: PersonalResult) {
        self.picks += 1;
        match result {
            PersonalResult::Won => {
                self.decided_games += 1;
                self.wins += 1;
            }
            PersonalResult::Lost => {
                self.decided_games += 1;
                self.losses += 1;
            }
            PersonalResult::Drew => self.draws += 1,
            PersonalResult::Undecided => {}
        }
    }

    pub fn win_rate(&self) -> Option<f64> {
        if self.decided_games == 0 {
            None
        } else {
            Some(self.wins as f64 / self.decided_games as f64)
        }
    }
}
