use clap::error::ErrorKind;
use git2prompt::{cli::init_logging, cli::parse_args, run_git2prompt};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => return usage_failure(err),
    };

    init_logging(config.verbose);

    match run_git2prompt(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Help and version requests exit 0 through clap; every other argument
/// problem is a failure with exit code 1.
fn usage_failure(err: anyhow::Error) -> ExitCode {
    match err.downcast::<clap::Error>() {
        Ok(clap_err) => match clap_err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => clap_err.exit(),
            _ => {
                let _ = clap_err.print();
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
