//! Retry engine with declarative failure classification.
//!
//! Build a [`Retry`] by registering which failure categories are retryable,
//! optionally capping attempts and adding a delay, then drive a fallible
//! operation through [`Retry::execute`] or [`Retry::execute_async`].

pub mod classify;
pub mod config;
pub mod logging;
pub mod retry;

pub use classify::{Category, Classifier, Rule, Taxonomy, TaxonomyError};
pub use config::{FailsafeConfig, RetryConfig};
pub use retry::{ConfigError, DelayFn, GiveUpReason, Retry, RetryDecision};
