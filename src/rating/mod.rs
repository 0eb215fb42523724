//! Sequential two-team rating
//!
//! The engine folds games in order through the validity gate and the
//! closed-form Gaussian update, keeping a snapshot history as it goes. The
//! match quality estimator is shared with the balance search.

pub mod engine;
pub mod gate;
pub mod gaussian;
pub mod history;
pub mod quality;
pub mod update;

// Re-export commonly used types
pub use engine::{Diagnostics, GameProcessing, RatingEngine};
pub use gate::{Classification, GameValidityGate, SkipReason};
pub use history::HistoryRecorder;
pub use quality::MatchQualityEstimator;
pub use update::{rate_two_teams, team_weights, TwoTeamOutcome, TwoTeamPosterior, MIN_VARIANCE};
