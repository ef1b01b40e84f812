pub mod metrics;
pub mod report;

pub use metrics::{SCHEMA_VERSION, WeeklyMetric, json_schema, rate, rate_or_zero, round_rate};
pub use report::{ReportEnvelope, ReportEnvelopeError, ReportEnvelopeWarning};
