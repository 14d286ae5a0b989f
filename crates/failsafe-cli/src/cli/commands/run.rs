//! `failsafe run` – run a command until it succeeds or the policy gives up.

use anyhow::Result;
use failsafe_core::{FailsafeConfig, RetryConfig};

use crate::process;

/// Command-line overrides for one `failsafe run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    pub exit_codes: Vec<i32>,
    pub use_async: bool,
}

impl RunOptions {
    /// The config `[retry]` section with flags layered on top.
    pub fn retry_config(&self, cfg: &FailsafeConfig) -> RetryConfig {
        let mut retry = cfg.retry_or_default();
        if self.max_attempts.is_some() {
            retry.max_attempts = self.max_attempts;
        }
        if self.delay_ms.is_some() {
            retry.delay_ms = self.delay_ms;
        }
        retry
    }
}

pub async fn run_command(
    cfg: &FailsafeConfig,
    opts: &RunOptions,
    command: Vec<String>,
) -> Result<()> {
    let policy = process::build_policy(&opts.retry_config(cfg), &opts.exit_codes)?;
    tracing::info!(
        program = command.first().map(String::as_str).unwrap_or_default(),
        max_attempts = ?policy.max_attempts(),
        async_mode = opts.use_async,
        "running under retry policy"
    );

    if opts.use_async {
        policy
            .execute_async(|| process::run_once_async(&command))
            .await
    } else {
        // Blocking attempts and sleeps stay off the runtime's worker threads.
        tokio::task::spawn_blocking(move || policy.execute(|| process::run_once(&command))).await?
    }
}
