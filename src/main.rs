use clap::error::ErrorKind;
use std::process::ExitCode;

use worktree_setup::cli;
use worktree_setup::commands::create::{self, Outcome};
use worktree_setup::error::SetupError;
use worktree_setup::output;

fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    setup_logging();

    let invocation = match cli::parse_invocation(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(SetupError::Usage(e)) => {
            let _ = e.print();
            // --help counts as a usage failure; only --version exits cleanly
            return match e.kind() {
                ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
        Err(e) => {
            output::error(&e.into());
            return ExitCode::FAILURE;
        }
    };

    log::debug!("invocation: {:?}", invocation);

    match create::run(invocation) {
        Ok(Outcome::Created(_) | Outcome::Aborted) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}
