use failsafe_core::logging;

mod cli;
mod process;

use crate::cli::CliCommand;
use crate::process::NonZeroExit;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("failsafe error: {:#}", err);
        let code = err
            .downcast_ref::<NonZeroExit>()
            .map(|e| e.code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
