use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

pub const SCHEMA_VERSION: &str = "agentperf.weekly-metric.v1";

/// One row of the weekly metrics table: distinct-person pipeline counts for a
/// single agent in a single Monday-start calendar week, plus the derived
/// conversion rates. Rows are immutable once loaded for a cache window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WeeklyMetric {
    pub agent: String,
    #[schemars(with = "String")]
    pub week_start: Date,
    #[schemars(with = "String")]
    pub week_end: Date,
    pub total_viewings: u64,
    pub applications: u64,
    pub tenants: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_to_app_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_to_tenant_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_conversion_rate: Option<f64>,
}

/// Percentage rounded to one decimal place.
#[must_use]
pub fn round_rate(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-week rate semantics: a zero denominator is an undefined rate, not an
/// error and not infinity.
#[must_use]
pub fn rate(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(round_rate(numerator as f64 / denominator as f64 * 100.0))
}

/// Summary rate semantics: a zero denominator collapses to 0.0 for display.
#[must_use]
pub fn rate_or_zero(numerator: u64, denominator: u64) -> f64 {
    rate(numerator, denominator).unwrap_or(0.0)
}

#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(WeeklyMetric);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated weekly metric schema: {error}");
        }
    }
}
