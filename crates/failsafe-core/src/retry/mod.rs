//! Retry engine.
//!
//! [`Retry`] combines a failure classifier with an attempt ceiling and a
//! per-attempt delay function, and drives an operation through the
//! attempt / classify / wait loop either on the calling thread
//! ([`Retry::execute`]) or on the tokio timer ([`Retry::execute_async`]).
//! Both loops share [`Retry::decide`], so they only differ in how they wait.

mod error;
mod ext;
mod policy;
mod run;

pub use error::ConfigError;
pub use policy::{DelayFn, GiveUpReason, Retry, RetryDecision};
