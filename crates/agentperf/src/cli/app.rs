use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    rankings::RankingsArgs, schema::SchemaArgs, summary::SummaryArgs, trend::TrendArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "agentperf",
    version,
    about = "Lettings agent performance analytics"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_name = "SECONDS")]
    pub cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Rankings(RankingsArgs),
    Trend(TrendArgs),
    Summary(SummaryArgs),
    Schema(SchemaArgs),
}
