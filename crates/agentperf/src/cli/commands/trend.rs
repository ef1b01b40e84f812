use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::aggregate::agent_universe;
use crate::config::RuntimeConfig;
use crate::models::ReportEnvelope;
use crate::summary::trend;

#[derive(Debug, Clone, Args)]
pub struct TrendArgs {
    /// Agent whose weekly conversion series to report.
    #[arg(long, value_name = "NAME")]
    pub agent: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &TrendArgs, config: &RuntimeConfig) -> Result<()> {
    println!(
        "trend: start agent={} db={}",
        args.agent,
        config.db_path.display()
    );

    let metrics = super::load_weekly_metrics(config)?;
    let known_agent = agent_universe(&metrics)
        .iter()
        .any(|agent| agent == &args.agent);
    let points = trend(&metrics, &args.agent);

    if args.json {
        let mut envelope = ReportEnvelope::ok(
            "trend",
            json!({
                "agent": args.agent,
                "points": points,
            }),
        )
        .with_meta("point_count", json!(points.len()));
        if !known_agent {
            envelope = envelope.with_warning(
                "agent_not_found",
                format!("agent `{}` has no viewings in the store", args.agent),
            );
        }
        let encoded = serde_json::to_string(&envelope).context("failed to encode trend envelope")?;
        println!("{encoded}");
    } else {
        println!("Weekly Conversion Trend – {}", args.agent);
        for point in &points {
            match point.total_conversion_rate {
                Some(value) => println!("{} {value:.1}%", point.week_start),
                None => println!("{} -", point.week_start),
            }
        }
    }

    println!("trend: complete agent={} points={}", args.agent, points.len());
    Ok(())
}
