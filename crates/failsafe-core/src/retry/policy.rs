use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{Category, Classifier, Rule, Taxonomy};
use crate::config::RetryConfig;

use super::error::ConfigError;

/// Maps the 1-based number of the attempt that just failed to the wait before the next one.
pub type DelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Why the engine stopped retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// The attempt ceiling was reached, whether or not the failure was retryable.
    Exhausted,
    /// No rule matched the failure.
    NotRetryable,
}

impl fmt::Display for GiveUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveUpReason::Exhausted => write!(f, "retry budget exhausted"),
            GiveUpReason::NotRetryable => write!(f, "failure not retryable"),
        }
    }
}

/// Decision taken after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop and hand the failure back to the caller unchanged.
    GiveUp(GiveUpReason),
    /// Try again, after waiting if a delay is given.
    RetryAfter(Option<Duration>),
}

/// Retry policy and executor.
///
/// Configuration methods consume and return the engine so they chain:
///
/// ```
/// use failsafe_core::Retry;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Busy;
/// impl std::fmt::Display for Busy {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "busy")
///     }
/// }
///
/// let retry = Retry::new()
///     .catch::<Busy>()
///     .with_max_attempts(3)
///     .with_fixed_delay(Duration::from_millis(1));
///
/// let mut calls = 0;
/// let value = retry
///     .execute(|| {
///         calls += 1;
///         if calls < 3 {
///             Err(anyhow::Error::msg(Busy))
///         } else {
///             Ok(calls)
///         }
///     })
///     .unwrap();
/// assert_eq!(value, 3);
/// ```
///
/// Execution only reads the configuration, so one engine can run any number
/// of operations.
#[derive(Clone, Default)]
pub struct Retry {
    classifier: Classifier,
    max_attempts: Option<u32>,
    delay: Option<DelayFn>,
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("classifier", &self.classifier)
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Retry {
    /// Engine with no rules, no attempt ceiling and no delay.
    /// Derived categories resolve against an empty taxonomy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose derived-category rules resolve through `taxonomy`.
    pub fn with_taxonomy(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            classifier: Classifier::new(taxonomy),
            ..Self::default()
        }
    }

    /// Engine configured from a `[retry]` config section.
    pub fn from_config(cfg: &RetryConfig) -> Result<Self, ConfigError> {
        Self::new().apply_config(cfg)
    }

    /// Overlay the ceiling and fixed delay from `cfg`; rules are kept.
    pub fn apply_config(mut self, cfg: &RetryConfig) -> Result<Self, ConfigError> {
        if let Some(n) = cfg.max_attempts {
            self = self.try_with_max_attempts(n)?;
        }
        if let Some(ms) = cfg.delay_ms {
            self = self.with_fixed_delay(Duration::from_millis(ms));
        }
        Ok(self)
    }

    /// Retry failures whose category is exactly `C`.
    pub fn catch<C: Category>(self) -> Self {
        self.catch_rule(Rule::exact::<C>())
    }

    /// Retry failures of category `C` or any category derived from it.
    pub fn catch_derived<C: Category>(self) -> Self {
        self.catch_rule(Rule::derived::<C>())
    }

    /// Retry failures of category `C` (and descendants when `include_derived`)
    /// that `predicate` accepts.
    pub fn catch_if<C, F>(self, include_derived: bool, predicate: F) -> Self
    where
        C: Category,
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.catch_rule(Rule::when::<C, F>(include_derived, predicate))
    }

    /// Retry failures that `rule` matches.
    pub fn catch_rule(mut self, rule: Rule) -> Self {
        self.classifier.add(rule);
        self
    }

    /// Limit the total number of attempts, including the first. Replaces any earlier limit.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        match self.try_with_max_attempts(max_attempts) {
            Ok(retry) => retry,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible form of [`Retry::with_max_attempts`]: zero is a [`ConfigError`].
    pub fn try_with_max_attempts(mut self, max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        self.max_attempts = Some(max_attempts);
        Ok(self)
    }

    /// Wait `delay(attempt)` after failed attempt number `attempt` before trying again.
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Arc::new(delay));
        self
    }

    /// Wait the same `delay` after every failed attempt.
    pub fn with_fixed_delay(self, delay: Duration) -> Self {
        self.with_delay(move |_| delay)
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn has_delay(&self) -> bool {
        self.delay.is_some()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Decide what follows failed attempt number `attempt` (1-based).
    ///
    /// The ceiling is checked before the classifier: once the budget is spent
    /// even a retryable failure gives up.
    pub fn decide(&self, attempt: u32, failure: &anyhow::Error) -> RetryDecision {
        if self.max_attempts.is_some_and(|max| attempt >= max) {
            return RetryDecision::GiveUp(GiveUpReason::Exhausted);
        }
        if !self.classifier.matches(failure) {
            return RetryDecision::GiveUp(GiveUpReason::NotRetryable);
        }
        RetryDecision::RetryAfter(self.delay.as_ref().map(|delay| delay(attempt)))
    }
}
