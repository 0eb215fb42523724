//! Append-only rating history
//!
//! One snapshot per participant per rated game, keyed by the rated-game
//! sequence number, for trend charts drawn by an external collaborator.

use crate::types::{Belief, CompetitorId, RatingSnapshot};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    snapshots: Vec<RatingSnapshot>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot; sequence numbers must never go backwards
    pub fn record(&mut self, sequence_number: u64, competitor_id: &str, belief: Belief) {
        debug_assert!(self
            .snapshots
            .last()
            .map_or(true, |last| last.sequence_number <= sequence_number));

        self.snapshots.push(RatingSnapshot {
            sequence_number,
            competitor_id: competitor_id.to_string(),
            mean: belief.mean,
            stddev: belief.stddev,
        });
    }

    pub fn snapshots(&self) -> &[RatingSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots written by one rated game
    pub fn for_game(&self, sequence_number: u64) -> Vec<&RatingSnapshot> {
        let start = self
            .snapshots
            .partition_point(|s| s.sequence_number < sequence_number);
        self.snapshots[start..]
            .iter()
            .take_while(|s| s.sequence_number == sequence_number)
            .collect()
    }

    /// One competitor's trajectory in rated-game order
    pub fn for_competitor<'a>(&'a self, competitor_id: &'a str) -> impl Iterator<Item = &'a RatingSnapshot> + 'a {
        self.snapshots
            .iter()
            .filter(move |s| s.competitor_id == competitor_id)
    }

    /// All snapshots grouped by rated-game index
    pub fn by_game(&self) -> BTreeMap<u64, Vec<&RatingSnapshot>> {
        let mut grouped: BTreeMap<u64, Vec<&RatingSnapshot>> = BTreeMap::new();
        for snapshot in &self.snapshots {
            grouped
                .entry(snapshot.sequence_number)
                .or_default()
                .push(snapshot);
        }
        grouped
    }

    /// Competitors that appear anywhere in the history
    pub fn competitors(&self) -> Vec<CompetitorId> {
        let mut ids: Vec<CompetitorId> = self
            .snapshots
            .iter()
            .map(|s| s.competitor_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
