//! Child-process failures and the retry policy built around them.
//!
//! `ProcessFailure` is the parent category of everything a child can do
//! wrong once it is running (`NonZeroExit`, `Terminated`). `SpawnFailed` is a
//! separate root: if the program cannot be started, retrying will not help.

use anyhow::Result;
use failsafe_core::{Retry, RetryConfig, Taxonomy};
use std::fmt;
use std::io;
use std::process::{Command, ExitStatus};
use std::sync::Arc;

/// The child ran and did not succeed.
#[derive(Debug, Clone)]
pub struct ProcessFailure {
    pub program: String,
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed", self.program)
    }
}

impl std::error::Error for ProcessFailure {}

/// The child exited with a non-zero status code.
#[derive(Debug, Clone)]
pub struct NonZeroExit {
    pub code: i32,
    pub failure: ProcessFailure,
}

impl AsRef<ProcessFailure> for NonZeroExit {
    fn as_ref(&self) -> &ProcessFailure {
        &self.failure
    }
}

impl fmt::Display for NonZeroExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exited with status {}", self.failure.program, self.code)
    }
}

impl std::error::Error for NonZeroExit {}

/// The child was killed by a signal and has no exit code.
#[derive(Debug, Clone)]
pub struct Terminated {
    pub failure: ProcessFailure,
}

impl AsRef<ProcessFailure> for Terminated {
    fn as_ref(&self) -> &ProcessFailure {
        &self.failure
    }
}

impl fmt::Display for Terminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was terminated by a signal", self.failure.program)
    }
}

impl std::error::Error for Terminated {}

/// The program could not be started at all.
#[derive(Debug)]
pub struct SpawnFailed {
    pub program: String,
    pub source: io::Error,
}

impl fmt::Display for SpawnFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not start {}: {}", self.program, self.source)
    }
}

impl std::error::Error for SpawnFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

pub fn taxonomy() -> Result<Arc<Taxonomy>> {
    let mut t = Taxonomy::new();
    t.root::<ProcessFailure>()?
        .derive::<NonZeroExit, ProcessFailure>()?
        .derive::<Terminated, ProcessFailure>()?
        .root::<SpawnFailed>()?;
    Ok(Arc::new(t))
}

/// Policy for `failsafe run`: every `ProcessFailure` descendant is retried,
/// or only the listed exit codes when `exit_codes` is non-empty.
pub fn build_policy(cfg: &RetryConfig, exit_codes: &[i32]) -> Result<Retry> {
    let retry = Retry::with_taxonomy(taxonomy()?);
    let retry = if exit_codes.is_empty() {
        retry.catch_derived::<ProcessFailure>()
    } else {
        let codes = exit_codes.to_vec();
        retry.catch_if::<NonZeroExit, _>(false, move |e| codes.contains(&e.code))
    };
    Ok(retry.apply_config(cfg)?)
}

/// Map a finished child's status to success or a categorized failure.
pub fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let failure = ProcessFailure {
        program: program.to_string(),
    };
    match status.code() {
        Some(code) => Err(NonZeroExit { code, failure }.into()),
        None => Err(Terminated { failure }.into()),
    }
}

fn split(command: &[String]) -> Result<(&String, &[String])> {
    command
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("no command given"))
}

/// Run the command once, blocking until it exits.
pub fn run_once(command: &[String]) -> Result<()> {
    let (program, args) = split(command)?;
    tracing::debug!(%program, "starting child");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| SpawnFailed {
            program: program.clone(),
            source,
        })?;
    check_status(program, status)
}

/// Run the command once on the tokio process driver.
pub async fn run_once_async(command: &[String]) -> Result<()> {
    let (program, args) = split(command)?;
    tracing::debug!(%program, "starting child");
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| SpawnFailed {
            program: program.clone(),
            source,
        })?;
    check_status(program, status)
}
