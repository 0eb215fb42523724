//! Metrics collection using Prometheus
//!
//! Counters and timings for game processing and balance searches.

use crate::rating::gate::SkipReason;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for the rating engine and balance search
#[derive(Clone)]
pub struct RatingMetrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Games seen by the engine, by status (rated/skipped)
    pub games_processed_total: IntCounterVec,

    /// Skipped games by reason
    pub games_skipped_total: IntCounterVec,

    /// Posterior variances raised to the numeric floor
    pub variance_clamped_total: IntCounter,

    /// Time spent applying one rated game
    pub rating_update_duration: Histogram,

    /// Roster partitions scored by balance searches
    pub balance_partitions_evaluated_total: IntCounter,

    /// Time spent on one balance search
    pub balance_search_duration: Histogram,
}

impl RatingMetrics {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a new metrics collector on a shared registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let games_processed_total = IntCounterVec::new(
            Opts::new("skill_ledger_games_processed_total", "Games processed"),
            &["status"],
        )?;
        registry.register(Box::new(games_processed_total.clone()))?;

        let games_skipped_total = IntCounterVec::new(
            Opts::new(
                "skill_ledger_games_skipped_total",
                "Games excluded from rating",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(games_skipped_total.clone()))?;

        let variance_clamped_total = IntCounter::new(
            "skill_ledger_variance_clamped_total",
            "Posterior variances clamped to the numeric floor",
        )?;
        registry.register(Box::new(variance_clamped_total.clone()))?;

        let rating_update_duration = Histogram::with_opts(
            HistogramOpts::new(
                "skill_ledger_rating_update_duration_seconds",
                "Rating update time",
            )
            .buckets(vec![0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05]),
        )?;
        registry.register(Box::new(rating_update_duration.clone()))?;

        let balance_partitions_evaluated_total = IntCounter::new(
            "skill_ledger_balance_partitions_evaluated_total",
            "Roster partitions scored",
        )?;
        registry.register(Box::new(balance_partitions_evaluated_total.clone()))?;

        let balance_search_duration = Histogram::with_opts(
            HistogramOpts::new(
                "skill_ledger_balance_search_duration_seconds",
                "Balance search time",
            )
            .buckets(vec![0.000_1, 0.001, 0.01, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(balance_search_duration.clone()))?;

        Ok(Self {
            registry,
            games_processed_total,
            games_skipped_total,
            variance_clamped_total,
            rating_update_duration,
            balance_partitions_evaluated_total,
            balance_search_duration,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record a rated game
    pub fn record_rated_game(&self, duration: Duration, clamped_variances: u32) {
        self.games_processed_total
            .with_label_values(&["rated"])
            .inc();
        self.rating_update_duration.observe(duration.as_secs_f64());
        if clamped_variances > 0 {
            self.variance_clamped_total
                .inc_by(u64::from(clamped_variances));
        }
    }

    /// Record a game the validity gate rejected
    pub fn record_skipped_game(&self, reason: SkipReason) {
        self.games_processed_total
            .with_label_values(&["skipped"])
            .inc();
        self.games_skipped_total
            .with_label_values(&[reason.as_str()])
            .inc();
    }

    /// Record a finished balance search
    pub fn record_balance_search(&self, partitions: u64, duration: Duration) {
        self.balance_partitions_evaluated_total.inc_by(partitions);
        self.balance_search_duration.observe(duration.as_secs_f64());
    }

    /// Render all registered metrics in the text exposition format
    pub fn encode_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    /// Start timing an operation
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}
