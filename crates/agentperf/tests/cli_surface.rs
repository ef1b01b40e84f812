use std::path::Path;

use agentperf::cli::app::{Cli, Command};
use agentperf::cli::commands::rankings::ModeArg;
use clap::Parser;

#[test]
fn parses_global_runtime_flags_for_rankings() {
    let cli = Cli::parse_from([
        "agentperf",
        "--home-dir",
        "/home/tester",
        "--cwd",
        "/work/repo",
        "--db",
        "/tmp/lettings.sqlite3",
        "--cache-ttl-secs",
        "120",
        "rankings",
        "--mode",
        "month",
        "--date",
        "2024-02-15",
    ]);

    assert_eq!(
        cli.runtime.home_dir.as_deref(),
        Some(Path::new("/home/tester"))
    );
    assert_eq!(cli.runtime.cwd.as_deref(), Some(Path::new("/work/repo")));
    assert_eq!(
        cli.runtime.db.as_deref(),
        Some(Path::new("/tmp/lettings.sqlite3"))
    );
    assert_eq!(cli.runtime.cache_ttl_secs, Some(120));

    match cli.command {
        Command::Rankings(args) => {
            assert_eq!(args.mode, ModeArg::Month);
            assert_eq!(args.date.as_deref(), Some("2024-02-15"));
            assert!(args.start.is_none());
            assert!(!args.json);
        }
        other => panic!("expected rankings command, got {other:?}"),
    }
}

#[test]
fn rankings_defaults_to_week_mode() {
    let cli = Cli::parse_from(["agentperf", "rankings"]);

    match cli.command {
        Command::Rankings(args) => assert_eq!(args.mode, ModeArg::Week),
        other => panic!("expected rankings command, got {other:?}"),
    }
}

#[test]
fn parses_custom_range_bounds() {
    let cli = Cli::parse_from([
        "agentperf",
        "rankings",
        "--mode",
        "custom",
        "--start",
        "2024-03-10",
        "--end",
        "2024-03-01",
        "--json",
    ]);

    match cli.command {
        Command::Rankings(args) => {
            assert_eq!(args.mode, ModeArg::Custom);
            assert_eq!(args.start.as_deref(), Some("2024-03-10"));
            assert_eq!(args.end.as_deref(), Some("2024-03-01"));
            assert!(args.json);
        }
        other => panic!("expected rankings command, got {other:?}"),
    }
}

#[test]
fn parses_trend_agent_flag() {
    let cli = Cli::parse_from(["agentperf", "trend", "--agent", "Avery", "--json"]);

    match cli.command {
        Command::Trend(args) => {
            assert_eq!(args.agent, "Avery");
            assert!(args.json);
        }
        other => panic!("expected trend command, got {other:?}"),
    }
}

#[test]
fn parses_summary_agent_flag() {
    let cli = Cli::parse_from(["agentperf", "summary", "--agent", "Blake"]);

    match cli.command {
        Command::Summary(args) => {
            assert_eq!(args.agent, "Blake");
            assert!(!args.json);
        }
        other => panic!("expected summary command, got {other:?}"),
    }
}

#[test]
fn parses_schema_json_flag() {
    let cli = Cli::parse_from(["agentperf", "schema", "--json"]);

    match cli.command {
        Command::Schema(args) => assert!(args.json),
        other => panic!("expected schema command, got {other:?}"),
    }
}
