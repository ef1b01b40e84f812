use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;
use time::Date;

use crate::aggregate::{RankingDataset, ranking_dataset};
use crate::config::RuntimeConfig;
use crate::models::ReportEnvelope;
use crate::period::{PeriodInputs, PeriodMode, available_range, resolve_period};
use crate::utils::dates::parse_iso_date;

#[derive(Debug, Clone, Args)]
pub struct RankingsArgs {
    #[arg(long, value_enum, default_value_t = ModeArg::Week)]
    pub mode: ModeArg,

    /// Anchor date for week and month modes, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Custom-mode start bound, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Custom-mode end bound, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Week,
    Month,
    Custom,
}

impl ModeArg {
    #[must_use]
    pub const fn to_period_mode(self) -> PeriodMode {
        match self {
            Self::Week => PeriodMode::Week,
            Self::Month => PeriodMode::Month,
            Self::Custom => PeriodMode::Custom,
        }
    }
}

pub fn run(args: &RankingsArgs, config: &RuntimeConfig) -> Result<()> {
    let mode = args.mode.to_period_mode();
    println!(
        "rankings: start mode={} db={}",
        mode.as_str(),
        config.db_path.display()
    );

    let metrics = super::load_weekly_metrics(config)?;
    let inputs = PeriodInputs {
        anchor: parse_optional_date(args.date.as_deref(), "--date")?,
        custom_start: parse_optional_date(args.start.as_deref(), "--start")?,
        custom_end: parse_optional_date(args.end.as_deref(), "--end")?,
    };
    let available = available_range(&metrics);
    let selection = resolve_period(mode, inputs, available.as_ref())?;
    let dataset = ranking_dataset(&metrics, &selection);

    if args.json {
        emit_envelope(&dataset, metrics.is_empty())?;
    } else {
        emit_table(&dataset);
    }

    println!(
        "rankings: complete period=\"{}\" agents={}",
        dataset.period.label,
        dataset.rows.len()
    );
    Ok(())
}

fn parse_optional_date(raw: Option<&str>, flag: &str) -> Result<Option<Date>> {
    raw.map(|value| parse_iso_date(value).with_context(|| format!("invalid {flag} value")))
        .transpose()
}

fn emit_envelope(dataset: &RankingDataset, empty_dataset: bool) -> Result<()> {
    let mut envelope = ReportEnvelope::ok("rankings", json!(dataset))
        .with_meta("agent_count", json!(dataset.rows.len()))
        .with_meta("period_mode", json!(dataset.period.mode.as_str()));
    if empty_dataset {
        envelope = envelope.with_warning("empty_dataset", "the store has no weekly metrics");
    }

    let encoded =
        serde_json::to_string(&envelope).context("failed to encode rankings envelope")?;
    println!("{encoded}");
    Ok(())
}

fn emit_table(dataset: &RankingDataset) {
    println!("Viewings vs Tenants – {}", dataset.period.label);
    for row in &dataset.rows {
        println!(
            "{:>3}. {:<24} viewings={:<6} tenants={}",
            row.rank, row.agent, row.total_viewings, row.tenants
        );
    }
}
