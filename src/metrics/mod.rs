//! Metrics for the rating engine and balance search
//!
//! Attaching metrics is optional; the engine keeps its own diagnostic
//! counters regardless.

pub mod collector;

pub use collector::{MetricsTimer, RatingMetrics};
