use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Retry policy parameters (optional `[retry]` section in config.toml).
///
/// Only the ceiling and a fixed delay are configurable here; which failures
/// are retryable is decided in code, where the failure types live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first). Unset = unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Fixed delay in milliseconds between attempts. Unset = no wait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

/// Global configuration loaded from `~/.config/failsafe/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailsafeConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for FailsafeConfig {
    fn default() -> Self {
        Self {
            retry: Some(RetryConfig {
                max_attempts: Some(3),
                delay_ms: Some(1000),
            }),
        }
    }
}

impl FailsafeConfig {
    /// The `[retry]` section, or an empty one (unbounded, no delay) when absent.
    pub fn retry_or_default(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("failsafe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FailsafeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FailsafeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<FailsafeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: FailsafeConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let cfg = FailsafeConfig::default();
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, Some(3));
        assert_eq!(retry.delay_ms, Some(1000));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FailsafeConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FailsafeConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_without_retry_section() {
        let cfg: FailsafeConfig = toml::from_str("").unwrap();
        assert!(cfg.retry.is_none());
        assert_eq!(cfg.retry_or_default(), RetryConfig::default());
    }

    #[test]
    fn config_toml_partial_retry_section() {
        let toml = r#"
            [retry]
            max_attempts = 7
        "#;
        let cfg: FailsafeConfig = toml::from_str(toml).unwrap();
        let retry = cfg.retry_or_default();
        assert_eq!(retry.max_attempts, Some(7));
        assert!(retry.delay_ms.is_none());
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[retry]\nmax_attempts = 2\ndelay_ms = 50").unwrap();
        let cfg = load_from_path(f.path()).unwrap();
        assert_eq!(
            cfg.retry,
            Some(RetryConfig {
                max_attempts: Some(2),
                delay_ms: Some(50),
            })
        );
    }

    #[test]
    fn load_from_path_reports_bad_toml() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[retry]\nmax_attempts = \"many\"").unwrap();
        let err = load_from_path(f.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));
    }
}
