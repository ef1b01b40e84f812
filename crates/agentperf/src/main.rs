#![forbid(unsafe_code)]

use std::path::PathBuf;

use agentperf::cli::app::{Cli, Command, RuntimeArgs};
use agentperf::cli::commands;
use agentperf::config::RuntimeConfig;
use agentperf::sqlite::DataSourceError;
use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_DATA_SOURCE_FAILURE: i32 = 2;
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
    println!("agentperf: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("agentperf: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("agentperf: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = resolve_runtime_config(&cli.runtime)?;
    match cli.command {
        Command::Rankings(args) => commands::rankings::run(&args, &config),
        Command::Trend(args) => commands::trend::run(&args, &config),
        Command::Summary(args) => commands::summary::run(&args, &config),
        Command::Schema(args) => commands::schema::run(&args, &config),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<DataSourceError>().is_some() {
        EXIT_DATA_SOURCE_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
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
        Command::Rankings(_) => "rankings",
        Command::Trend(_) => "trend",
        Command::Summary(_) => "summary",
        Command::Schema(_) => "schema",
    }
}

fn resolve_runtime_config(args: &RuntimeArgs) -> Result<RuntimeConfig> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    agentperf::config::resolve_runtime_config(
        &home_dir,
        &cwd,
        args.db.as_deref(),
        args.cache_ttl_secs,
    )
}
