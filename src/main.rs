use askshell::cli::Cli;
use askshell::{commands, logging};
use clap::Parser;
use colored::*;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
