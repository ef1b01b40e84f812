use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const REPORT_ENVELOPE_SCHEMA_VERSION: &str = "agentperf.report-envelope.v1";

pub type ReportEnvelopeMeta = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelopeWarning {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelopeError {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// JSON wrapper around every dataset handed to the rendering layer: the
/// ranking, trend, and summary reports all travel inside this envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub ok: bool,
    pub report: String,
    pub generated_at_utc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    pub meta: ReportEnvelopeMeta,
    pub warnings: Vec<ReportEnvelopeWarning>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportEnvelopeError>,
}

impl ReportEnvelope {
    #[must_use]
    pub fn ok(report: impl Into<String>, data: Value) -> Self {
        Self::base(report, true).with_data(data)
    }

    #[must_use]
    pub fn error(
        report: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut envelope = Self::base(report, false);
        envelope.error = Some(ReportEnvelopeError {
            code: code.into(),
            message: message.into(),
            details: None,
        });
        envelope
    }

    fn base(report: impl Into<String>, ok: bool) -> Self {
        let mut meta = ReportEnvelopeMeta::new();
        meta.insert(
            "schema_version".to_string(),
            json!(REPORT_ENVELOPE_SCHEMA_VERSION),
        );

        Self {
            ok,
            report: report.into(),
            generated_at_utc: generated_at_utc_now(),
            data: None,
            meta,
            warnings: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_warning(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.warnings.push(ReportEnvelopeWarning {
            code: code.into(),
            message: message.into(),
            details: None,
        });
        self
    }
}

fn generated_at_utc_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
