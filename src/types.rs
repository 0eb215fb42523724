//! Common types used throughout the rating engine and team balancer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;
use std::collections::BTreeMap;

/// Canonical identifier for a competitor (aliases are resolved upstream)
pub type CompetitorId = String;

/// Identifier of a team inside a single game
pub type TeamId = u32;

/// Gaussian belief over one competitor's latent skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub mean: f64,
    pub stddev: f64,
}

impl Belief {
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }

    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }

    /// Mean multiplied by the cosmetic display scale
    pub fn scaled_mean(&self, display_scale: f64) -> f64 {
        self.mean * display_scale
    }

    pub fn scaled_stddev(&self, display_scale: f64) -> f64 {
        self.stddev * display_scale
    }

    /// How far the uncertainty has shrunk from the prior, as a percentage
    pub fn confidence_percent(&self, prior_stddev: f64) -> f64 {
        if prior_stddev <= 0.0 {
            return 0.0;
        }
        (1.0 - self.stddev / prior_stddev).max(0.0) * 100.0
    }
}

impl From<TrueSkillRating> for Belief {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mean: rating.rating,
            stddev: rating.uncertainty,
        }
    }
}

impl From<Belief> for TrueSkillRating {
    fn from(belief: Belief) -> Self {
        Self {
            rating: belief.mean,
            uncertainty: belief.stddev,
        }
    }
}

/// One side of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub members: Vec<CompetitorId>,
    /// Civilization each member picked, when the replay recorded it
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub civilizations: BTreeMap<CompetitorId, String>,
}

impl TeamRoster {
    pub fn new<I, S>(team_id: TeamId, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompetitorId>,
    {
        Self {
            team_id,
            members: members.into_iter().map(Into::into).collect(),
            civilizations: BTreeMap::new(),
        }
    }

    pub fn with_civilization(
        mut self,
        competitor_id: impl Into<CompetitorId>,
        civilization: impl Into<String>,
    ) -> Self {
        self.civilizations
            .insert(competitor_id.into(), civilization.into());
        self
    }

    pub fn civilization(&self, competitor_id: &str) -> Option<&str> {
        self.civilizations.get(competitor_id).map(String::as_str)
    }
}

/// A finished game as handed over by the replay parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub teams: Vec<TeamRoster>,
    /// `None` together with `is_draw` marks a draw; `None` alone means the
    /// outcome could not be determined
    pub winning_team_id: Option<TeamId>,
    #[serde(default)]
    pub is_draw: bool,
    pub timestamp: DateTime<Utc>,
    /// In-game length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl GameRecord {
    /// A decisive game won by `winning_team_id`
    pub fn decisive(teams: Vec<TeamRoster>, winning_team_id: TeamId, timestamp: DateTime<Utc>) -> Self {
        Self {
            teams,
            winning_team_id: Some(winning_team_id),
            is_draw: false,
            timestamp,
            duration_seconds: None,
        }
    }

    pub fn draw(teams: Vec<TeamRoster>, timestamp: DateTime<Utc>) -> Self {
        Self {
            teams,
            winning_team_id: None,
            is_draw: true,
            timestamp,
            duration_seconds: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Every listed competitor, team by team
    pub fn participants(&self) -> impl Iterator<Item = &CompetitorId> {
        self.teams.iter().flat_map(|team| team.members.iter())
    }

    pub fn team(&self, team_id: TeamId) -> Option<&TeamRoster> {
        self.teams.iter().find(|team| team.team_id == team_id)
    }
}

/// History entry appended for each participant of a rated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub sequence_number: u64,
    pub competitor_id: CompetitorId,
    pub mean: f64,
    pub stddev: f64,
}

/// Belief change for one participant of a rated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub competitor_id: CompetitorId,
    pub old_belief: Belief,
    pub new_belief: Belief,
}

impl RatingUpdate {
    pub fn mean_delta(&self) -> f64 {
        self.new_belief.mean - self.old_belief.mean
    }
}

/// Public view of a competitor's rating
///
/// Both the unscaled and the display-scaled values are carried so a storage
/// collaborator can round-trip a standing without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStanding {
    pub competitor_id: CompetitorId,
    pub mean: f64,
    pub stddev: f64,
    pub mean_scaled: f64,
    pub stddev_scaled: f64,
    pub games_played: u64,
    pub confidence_percent: f64,
    /// Fewer games than the configured ranking threshold
    pub provisional: bool,
}

impl CompetitorStanding {
    pub fn belief(&self) -> Belief {
        Belief::new(self.mean, self.stddev)
    }
}

/// Mean change a competitor would see for each possible result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedDelta {
    pub on_a_win: f64,
    pub on_b_win: f64,
}

/// A candidate split of a roster into two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Match quality in [0, 1], higher is more balanced
    pub quality: f64,
    pub team_a: Vec<CompetitorId>,
    pub team_b: Vec<CompetitorId>,
    pub projected_deltas: BTreeMap<CompetitorId, ProjectedDelta>,
}

impl Matchup {
    pub fn quality_percent(&self) -> f64 {
        self.quality * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_percent() {
        let prior = Belief::new(25.0, 25.0 / 3.0);
        assert_eq!(prior.confidence_percent(25.0 / 3.0), 0.0);

        let sharpened = Belief::new(25.0, 25.0 / 6.0);
        assert!((sharpened.confidence_percent(25.0 / 3.0) - 50.0).abs() < 1e-9);

        // Wider than the prior never reports negative confidence
        let wide = Belief::new(25.0, 10.0);
        assert_eq!(wide.confidence_percent(25.0 / 3.0), 0.0);
    }

    #[test]
    fn test_scaled_values() {
        let belief = Belief::new(25.0, 2.0);
        assert_eq!(belief.scaled_mean(40.0), 1000.0);
        assert_eq!(belief.scaled_stddev(40.0), 80.0);
    }

    #[test]
    fn test_trueskill_rating_conversion() {
        let belief = Belief::new(27.5, 6.25);
        let rating: TrueSkillRating = belief.into();
        assert_eq!(rating.rating, 27.5);
        assert_eq!(rating.uncertainty, 6.25);
        assert_eq!(Belief::from(rating), belief);
    }

    #[test]
    fn test_game_record_json_defaults_draw_flag() {
        let json = r#"{
            "teams": [
                {"team_id": 1, "members": ["alice"]},
                {"team_id": 2, "members": ["bob"]}
            ],
            "winning_team_id": 2,
            "timestamp": "2024-05-01T20:00:00Z"
        }"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert!(!game.is_draw);
        assert_eq!(game.winning_team_id, Some(2));
        assert_eq!(game.participants().count(), 2);
        assert_eq!(game.team(2).unwrap().members, vec!["bob".to_string()]);
        assert!(game.duration_seconds.is_none());
        assert!(game.team(1).unwrap().civilizations.is_empty());
    }

    #[test]
    fn test_game_record_json_reads_duration_and_civilizations() {
        let json = r#"{
            "teams": [
                {"team_id": 1, "members": ["alice"], "civilizations": {"alice": "Franks"}},
                {"team_id": 2, "members": ["bob"]}
            ],
            "winning_team_id": 1,
            "timestamp": "2024-05-01T20:00:00Z",
            "duration_seconds": 1830.5
        }"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(game.duration_seconds, Some(1830.5));
        assert_eq!(game.team(1).unwrap().civilization("alice"), Some("Franks"));
        assert_eq!(game.team(2).unwrap().civilization("bob"), None);

        let written = serde_json::to_value(&game).unwrap();
        assert!(written["teams"][1].get("civilizations").is_none());
        assert_eq!(written["duration_seconds"], 1830.5);
    }
}
