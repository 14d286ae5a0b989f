//! Retry loops: run an operation until success or the policy says stop.

use std::future::Future;

use super::policy::{Retry, RetryDecision};

impl Retry {
    /// Runs `operation` on the calling thread until it succeeds or the policy
    /// gives up. Delays block the thread.
    ///
    /// On give-up the failure from the last attempt is returned as-is; the
    /// caller cannot tell an exhausted budget from a non-retryable failure by
    /// the error alone.
    pub fn execute<T, F>(&self, mut operation: F) -> anyhow::Result<T>
    where
        F: FnMut() -> anyhow::Result<T>,
    {
        let mut attempt = 1u32;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) => match self.next_step(attempt, &e) {
                    RetryDecision::GiveUp(_) => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        if let Some(d) = delay {
                            std::thread::sleep(d);
                        }
                        attempt = attempt.saturating_add(1);
                    }
                },
            }
        }
    }

    /// Async counterpart of [`Retry::execute`]: awaits each attempt and waits
    /// on the tokio timer. Only one attempt is in flight at a time.
    pub async fn execute_async<T, F, Fut>(&self, mut operation: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => match self.next_step(attempt, &e) {
                    RetryDecision::GiveUp(_) => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        if let Some(d) = delay {
                            tokio::time::sleep(d).await;
                        }
                        attempt = attempt.saturating_add(1);
                    }
                },
            }
        }
    }

    fn next_step(&self, attempt: u32, failure: &anyhow::Error) -> RetryDecision {
        let decision = self.decide(attempt, failure);
        match decision {
            RetryDecision::GiveUp(reason) => {
                tracing::debug!(attempt, %reason, "giving up");
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt, ?delay, "attempt failed, retrying");
            }
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[derive(Debug, thiserror::Error)]
    #[error("transient (attempt {0})")]
    struct Transient(u32);

    #[derive(Debug, thiserror::Error)]
    #[error("permanent")]
    struct Permanent;

    #[test]
    fn success_on_first_attempt_skips_classifier() {
        // No rules at all: a failure would be fatal, but there is none.
        let retry = Retry::new();
        let mut calls = 0;
        let value = retry
            .execute(|| {
                calls += 1;
                Ok::<_, anyhow::Error>("done")
            })
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls, 1);
    }

    #[test]
    fn returns_last_failure_unchanged() {
        let retry = Retry::new().catch::<Transient>().with_max_attempts(3);
        let mut calls = 0u32;
        let err = retry
            .execute(|| -> anyhow::Result<()> {
                calls += 1;
                Err(Transient(calls).into())
            })
            .unwrap_err();
        assert_eq!(calls, 3);
        let transient = err.downcast_ref::<Transient>().expect("original failure type");
        assert_eq!(transient.0, 3);
    }

    #[test]
    fn non_retryable_failure_stops_immediately() {
        let retry = Retry::new().catch::<Transient>();
        let mut calls = 0;
        let err = retry
            .execute(|| -> anyhow::Result<()> {
                calls += 1;
                Err(Permanent.into())
            })
            .unwrap_err();
        assert_eq!(calls, 1);
        assert!(err.is::<Permanent>());
    }

    #[test]
    fn blocking_path_waits_between_attempts() {
        let retry = Retry::new()
            .catch::<Transient>()
            .with_fixed_delay(Duration::from_millis(20));
        let mut calls = 0;
        let started = Instant::now();
        retry
            .execute(|| {
                calls += 1;
                if calls < 3 {
                    Err(Transient(calls).into())
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert_eq!(calls, 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn async_path_waits_on_timer() {
        let retry = Retry::new()
            .catch::<Transient>()
            .with_fixed_delay(Duration::from_millis(20));
        let mut calls = 0u32;
        let started = Instant::now();
        let value = retry
            .execute_async(|| {
                calls += 1;
                let n = calls;
                async move {
                    if n < 3 {
                        Err(anyhow::Error::new(Transient(n)))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
