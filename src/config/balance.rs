//! Team balance search configuration

use crate::balance::partition::MAX_ROSTER_SIZE;
use crate::error::RatingError;
use serde::{Deserialize, Serialize};

/// Settings for the roster partition search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Number of suggestions returned when the caller does not ask for a count
    pub top_n: usize,
    /// Largest roster searched exhaustively (work grows as 2^N)
    pub max_roster_size: usize,
    /// Score partitions on the rayon thread pool
    pub parallel: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            max_roster_size: 18,
            parallel: true,
        }
    }
}

impl BalanceConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.top_n == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Balance top_n must be greater than 0".to_string(),
            }
            .into());
        }

        // Partitions are enumerated as u32 bitmasks
        if !(2..=MAX_ROSTER_SIZE).contains(&self.max_roster_size) {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Balance max_roster_size must be between 2 and {}",
                    MAX_ROSTER_SIZE
                ),
            }
            .into());
        }

        Ok(())
    }
}
