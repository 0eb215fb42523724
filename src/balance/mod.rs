//! Balanced team suggestions
//!
//! Splits a roster into two teams every possible way and ranks the splits by
//! match quality, using a read-only snapshot of the engine's beliefs.

pub mod partition;
pub mod search;

pub use partition::{canonical_masks, canonical_partition_count, MAX_ROSTER_SIZE};
pub use search::{RosterSnapshot, TeamBalanceSearch};
