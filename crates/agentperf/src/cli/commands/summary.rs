use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::config::RuntimeConfig;
use crate::models::ReportEnvelope;
use crate::summary::{narrative, summarize};

#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    /// Agent whose lifetime performance to summarize.
    #[arg(long, value_name = "NAME")]
    pub agent: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &SummaryArgs, config: &RuntimeConfig) -> Result<()> {
    println!(
        "summary: start agent={} db={}",
        args.agent,
        config.db_path.display()
    );

    let metrics = super::load_weekly_metrics(config)?;
    let summary = summarize(&metrics, &args.agent);

    if args.json {
        let mut envelope = ReportEnvelope::ok("summary", json!(summary))
            .with_meta("total_viewings", json!(summary.total_viewings));
        if summary.period_start.is_none() {
            envelope = envelope.with_warning(
                "agent_not_found",
                format!("agent `{}` has no viewings in the store", args.agent),
            );
        }
        let encoded =
            serde_json::to_string(&envelope).context("failed to encode summary envelope")?;
        println!("{encoded}");
    } else {
        println!("{}", narrative(&summary));
    }

    println!(
        "summary: complete agent={} viewings={} tenants={}",
        summary.agent, summary.total_viewings, summary.total_tenants
    );
    Ok(())
}
