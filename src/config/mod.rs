//! Configuration management for skill-ledger
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the rating model.

pub mod app;
pub mod balance;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use balance::BalanceConfig;
pub use rating::RatingConfig;
