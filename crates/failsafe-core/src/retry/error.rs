//! Configuration errors for the retry engine.

use thiserror::Error;

/// Invalid retry configuration, reported when the policy is built rather than
/// when it runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroMaxAttempts,
}
