use clap::Parser;
use colored::*;
use std::process::ExitCode;

use error_common::log_error;
use triage_cli::{commands, load_config, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = async move {
        let config = load_config(&cli)?;
        logger_redacted::init_tracing(&config.logging)?;
        commands::dispatch(cli.command, &config).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error("triage-cli", &e).await;
            eprintln!("{} [{}] {}", "error:".red().bold(), e.code(), e);
            ExitCode::FAILURE
        }
    }
}
