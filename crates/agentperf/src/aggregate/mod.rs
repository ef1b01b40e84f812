use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::WeeklyMetric;
use crate::period::PeriodSelection;

/// Per-agent sums for one resolved period. Ranking compares viewings against
/// signed tenancies; applications are deliberately not part of this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentAggregate {
    pub agent: String,
    pub total_viewings: u64,
    pub tenants: u64,
    pub rank: usize,
}

/// Ranking dataset handed to the rendering layer: the resolved period (with
/// its display label) plus one row per known agent in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingDataset {
    pub period: PeriodSelection,
    pub rows: Vec<AgentAggregate>,
}

/// Every agent present anywhere in the dataset, alphabetical.
#[must_use]
pub fn agent_universe(metrics: &[WeeklyMetric]) -> Vec<String> {
    metrics
        .iter()
        .map(|metric| metric.agent.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sums viewings and tenants per agent across the weeks whose `week_start`
/// falls inside the period (inclusive both ends; a boundary that splits a
/// week includes or excludes the whole week on its start date alone).
///
/// Agents with no activity in the period still appear with zero sums. Rows
/// are ordered by summed viewings descending; ties keep alphabetical order.
#[must_use]
pub fn aggregate(metrics: &[WeeklyMetric], period: &PeriodSelection) -> Vec<AgentAggregate> {
    let mut sums: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for metric in metrics {
        if metric.week_start < period.start_date || metric.week_start > period.end_date {
            continue;
        }
        let entry = sums.entry(metric.agent.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(metric.total_viewings);
        entry.1 = entry.1.saturating_add(metric.tenants);
    }

    let mut rows: Vec<AgentAggregate> = agent_universe(metrics)
        .into_iter()
        .map(|agent| {
            let (total_viewings, tenants) = sums.get(agent.as_str()).copied().unwrap_or((0, 0));
            AgentAggregate {
                agent,
                total_viewings,
                tenants,
                rank: 0,
            }
        })
        .collect();

    // Stable sort over the alphabetical seed keeps ties alphabetical.
    rows.sort_by(|left, right| right.total_viewings.cmp(&left.total_viewings));
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    rows
}

#[must_use]
pub fn ranking_dataset(metrics: &[WeeklyMetric], period: &PeriodSelection) -> RankingDataset {
    RankingDataset {
        period: period.clone(),
        rows: aggregate(metrics, period),
    }
}
