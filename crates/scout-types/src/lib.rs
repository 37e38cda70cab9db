//! Shared types for the replay-scout workspace.
//!
//! This crate provides the foundational types used across the workspace,
//! breaking circular dependency chains:
//! - [`replay`]: the replay document model with safe accessors for
//!   partially-absent remote data
//! - [`playlist`]: the fixed game-mode table
//! - [`env_utils`]: environment variable parsing helpers

pub mod env_utils;
pub mod playlist;
pub mod replay;

pub use playlist::GameMode;
pub use replay::{PlayerEntry, PlayerRef, ReplayRecord, Team, TeamSide};

use std::time::Duration;

/// Configuration for retry behavior on network operations.
#[derive(Debug, Copy, Clone)]
pub struct RetryConfig {
    /// Number of retry attempts.
    pub retries: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_millis(5000),
        }
    }
}
