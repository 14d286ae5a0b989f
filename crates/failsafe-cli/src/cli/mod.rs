//! CLI for the failsafe retry runner.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use failsafe_core::config;

use commands::{run_command, show_config, RunOptions};

/// Top-level CLI for the failsafe retry runner.
#[derive(Debug, Parser)]
#[command(name = "failsafe")]
#[command(about = "Run a command, retrying it when it fails", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a command under the retry policy.
    Run {
        /// Maximum number of attempts, including the first (overrides config).
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,
        /// Fixed delay between attempts in milliseconds (overrides config).
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Only retry these exit codes (repeatable). Default: retry any failed run.
        #[arg(long = "exit-code", value_name = "CODE", allow_negative_numbers = true)]
        exit_codes: Vec<i32>,
        /// Drive attempts on the async runtime instead of a blocking worker thread.
        #[arg(long = "async")]
        use_async: bool,
        /// Program and its arguments.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show the config file path and the effective retry settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                max_attempts,
                delay_ms,
                exit_codes,
                use_async,
                command,
            } => {
                let opts = RunOptions {
                    max_attempts,
                    delay_ms,
                    exit_codes,
                    use_async,
                };
                run_command(&cfg, &opts, command).await?;
            }
            CliCommand::Config => show_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
