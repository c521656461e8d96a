//! Dryflow CLI - predict model schemas without materializing data

use clap::Parser;
use std::process::ExitCode as ProcessExitCode;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::run;

#[tokio::main]
async fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => ProcessExitCode::from(*code),
            None => {
                eprintln!("Error: {:#}", err);
                ProcessExitCode::from(2)
            }
        },
    }
}

/// `info` by default, `debug` with --verbose; RUST_LOG wins over both
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
