//! Catch-everything adapters.

use crate::classify::Rule;

use super::policy::Retry;

impl Retry {
    /// Retry on any failure, whatever its category.
    pub fn catch_any(self) -> Self {
        self.catch_rule(Rule::any())
    }

    /// Retry on any failure `predicate` accepts.
    pub fn catch_any_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.catch_rule(Rule::any_when(predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{GiveUpReason, RetryDecision};

    #[test]
    fn catch_any_retries_plain_errors() {
        let retry = Retry::new().catch_any();
        assert_eq!(
            retry.decide(1, &anyhow::anyhow!("disk busy")),
            RetryDecision::RetryAfter(None)
        );
    }

    #[test]
    fn catch_any_if_filters_on_message() {
        let retry = Retry::new().catch_any_if(|e| e.to_string().contains("busy"));
        assert_eq!(
            retry.decide(1, &anyhow::anyhow!("disk busy")),
            RetryDecision::RetryAfter(None)
        );
        assert_eq!(
            retry.decide(1, &anyhow::anyhow!("disk gone")),
            RetryDecision::GiveUp(GiveUpReason::NotRetryable)
        );
    }

    #[test]
    fn unit_operations_need_no_wrapper() {
        let retry = Retry::new().catch_any().with_max_attempts(5);
        let mut calls = 0;
        retry
            .execute(|| {
                calls += 1;
                if calls < 2 {
                    anyhow::bail!("not yet");
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 2);
    }
}
