//! Game length totals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongestGame {
    pub duration_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    /// Games that reported a usable length
    pub games_with_duration: u64,
    pub total_duration_seconds: f64,
    pub longest_game: Option<LongestGame>,
}

impl DurationSummary {
    /// Add one game's length; negative or non-finite lengths are ignored
    pub fn observe(&mut self, duration_seconds: f64, timestamp: DateTime<Utc>) -> bool {
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return false;
        }
        self.games_with_duration += 1;
        self.total_duration_seconds += duration_seconds;
        // First game to reach the record keeps it
        let longer = self
            .longest_game
            .map_or(true, |longest| duration_seconds > longest.duration_seconds);
        if longer {
            self.longest_game = Some(LongestGame {
                duration_seconds,
                timestamp,
            });
        }
        true
    }

    pub fn average_duration_seconds(&self) -> Option<f64> {
        if self.games_with_duration == 0 {
            None
        } else {
            Some(self.total_duration_seconds / self.games_with_duration as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_longest_game_keeps_first_of_equal_lengths() {
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 21, 0, 0).unwrap();
        let mut summary = DurationSummary::default();

        assert!(summary.observe(1200.0, first));
        assert!(summary.observe(1200.0, second));
        assert!(!summary.observe(f64::NAN, second));
        assert!(!summary.observe(-5.0, second));

        assert_eq!(summary.games_with_duration, 2);
        assert_eq!(summary.total_duration_seconds, 2400.0);
        assert_eq!(summary.longest_game.unwrap().timestamp, first);
        assert_eq!(summary.average_duration_seconds(), Some(1200.0));
    }

    #[test]
    fn test_empty_summary_has_no_average() {
        let summary = DurationSummary::default();
        assert_eq!(summary.average_duration_seconds(), None);
        assert!(summary.longest_game.is_none());
    }
}
