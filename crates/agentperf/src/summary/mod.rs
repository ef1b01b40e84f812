use serde::Serialize;
use time::Date;

use crate::models::{WeeklyMetric, rate_or_zero};
use crate::utils::dates::format_day_month_year;

/// Lifetime performance record for one agent, computed over the entire
/// dataset rather than a selected period. All rates are pre-rounded to one
/// decimal; zero denominators collapse to 0.0, never null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub agent: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<Date>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<Date>,

    pub total_viewings: u64,
    pub total_apps: u64,
    pub total_tenants: u64,
    pub app_rate: f64,
    pub tenant_rate: f64,
    pub overall_conversion: f64,
}

/// One point of an agent's conversion trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub week_start: Date,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_conversion_rate: Option<f64>,
}

#[must_use]
pub fn summarize(metrics: &[WeeklyMetric], agent: &str) -> AgentSummary {
    let mut total_viewings = 0u64;
    let mut total_apps = 0u64;
    let mut total_tenants = 0u64;
    let mut period_start: Option<Date> = None;
    let mut period_end: Option<Date> = None;

    for metric in metrics.iter().filter(|metric| metric.agent == agent) {
        total_viewings = total_viewings.saturating_add(metric.total_viewings);
        total_apps = total_apps.saturating_add(metric.applications);
        total_tenants = total_tenants.saturating_add(metric.tenants);
        period_start = Some(period_start.map_or(metric.week_start, |earliest| {
            earliest.min(metric.week_start)
        }));
        period_end = Some(period_end.map_or(metric.week_end, |latest| latest.max(metric.week_end)));
    }

    AgentSummary {
        agent: agent.to_string(),
        period_start,
        period_end,
        total_viewings,
        total_apps,
        total_tenants,
        app_rate: rate_or_zero(total_apps, total_viewings),
        tenant_rate: rate_or_zero(total_tenants, total_apps),
        overall_conversion: rate_or_zero(total_tenants, total_viewings),
    }
}

/// Full conversion time series for one agent, ordered by week.
#[must_use]
pub fn trend(metrics: &[WeeklyMetric], agent: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = metrics
        .iter()
        .filter(|metric| metric.agent == agent)
        .map(|metric| TrendPoint {
            week_start: metric.week_start,
            total_conversion_rate: metric.total_conversion_rate,
        })
        .collect();
    points.sort_by_key(|point| point.week_start);
    points
}

/// Narrative rendering of a summary, matching the dashboard prose.
#[must_use]
pub fn narrative(summary: &AgentSummary) -> String {
    let (Some(period_start), Some(period_end)) = (summary.period_start, summary.period_end) else {
        return format!("{} has no recorded viewings.", summary.agent);
    };

    format!(
        "Between {} and {}, {} carried out {} property viewings. \
         Around {:.1}% of those viewings led to applications ({} total), \
         and {:.1}% of applicants became tenants ({} total). \
         That is an overall conversion of {:.1}% from first viewing to signed lease.",
        format_day_month_year(period_start),
        format_day_month_year(period_end),
        summary.agent,
        summary.total_viewings,
        summary.app_rate,
        summary.total_apps,
        summary.tenant_rate,
        summary.total_tenants,
        summary.overall_conversion
    )
}
