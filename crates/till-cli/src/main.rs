//! Till CLI - apply and inspect versioned SQL migrations

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, migrate, new, status};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::New(args) => new::execute(args, &cli.global),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(code) = err.downcast_ref::<common::ExitCode>() {
                return std::process::ExitCode::from(code.0);
            }
            eprintln!("Error: {err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

/// Install env_logger; `RUST_LOG` wins over the `--verbose` default.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
