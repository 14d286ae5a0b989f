//! `failsafe config` – show where the config lives and what it resolves to.

use anyhow::Result;
use failsafe_core::config::{self, FailsafeConfig};

pub fn show_config(cfg: &FailsafeConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    let retry = cfg.retry_or_default();
    let max_attempts = retry
        .max_attempts
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unbounded".to_string());
    let delay = retry
        .delay_ms
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| "none".to_string());
    println!("max attempts: {}", max_attempts);
    println!("delay:        {}", delay);
    Ok(())
}
