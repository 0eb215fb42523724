//! Skill Ledger - Sequential team ratings and balanced team suggestions
//!
//! This crate folds chronologically ordered two-team game results into
//! Gaussian skill beliefs and uses those beliefs to suggest the most evenly
//! matched way to split a roster into two teams.

pub mod balance;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use balance::TeamBalanceSearch;
pub use rating::{GameValidityGate, MatchQualityEstimator, RatingEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
