#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Error, Result};
use clap::Parser;
use clap::error::ErrorKind;
use roster::cli::app::{Cli, Command, RuntimeArgs};
use roster::cli::commands;
use roster::config::RuntimePaths;
use roster::models::{CommandFailure, FailureKind, failure_kind};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_CONFIGURATION_FAILURE: i32 = 2;
const EXIT_CONNECTION_FAILURE: i32 = 3;
const EXIT_IO_FAILURE: i32 = 4;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = command_name(&cli.command);
    println!("roster: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("roster: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("roster: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
    match cli.command {
        Command::Ingest(args) => commands::ingest::run(&args, &runtime_paths),
        Command::Display(args) => commands::display::run(&args, &runtime_paths),
    }
}

fn classify_runtime_error(error: &Error) -> i32 {
    match failure_kind(error) {
        Some(FailureKind::Configuration) => EXIT_CONFIGURATION_FAILURE,
        Some(FailureKind::Connection) => EXIT_CONNECTION_FAILURE,
        Some(FailureKind::Io) => EXIT_IO_FAILURE,
        Some(FailureKind::Storage) | None => EXIT_RUNTIME_FAILURE,
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Ingest(_) => "ingest",
        Command::Display(_) => "display",
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
            Error::new(CommandFailure::configuration(
                "HOME is not set; pass --home-dir",
            ))
        })?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir().map_err(|error| {
            Error::new(CommandFailure::configuration(format!(
                "failed to resolve current directory: {error}"
            )))
        })?,
    };

    roster::config::resolve_runtime_paths(&home_dir, &cwd, args.db_path.as_deref())
}
