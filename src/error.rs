//! Error types for the rating engine and team balancer
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate, with a typed enum for the cases callers match on.

use crate::rating::gate::SkipReason;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating and balancing scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Game cannot be rated: {reason}")]
    UnratableGame { reason: SkipReason },

    #[error("Insufficient roster: need at least 2 competitors, got {size}")]
    InsufficientRoster { size: usize },

    #[error("Roster too large: {size} competitors exceeds the limit of {max}")]
    RosterTooLarge { size: usize, max: usize },

    #[error("Competitor has no rating: {competitor_id}")]
    UnknownCompetitor { competitor_id: String },

    #[error("Stored standing has an invalid belief: {competitor_id}")]
    InvalidStanding { competitor_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
