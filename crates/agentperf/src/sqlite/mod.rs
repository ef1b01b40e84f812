use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::path::Path;

use anyhow::{Error, Result};
use rusqlite::Connection;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::{WeeklyMetric, rate};
use crate::utils::dates::{parse_viewing_date, week_end_of, week_start_of};

pub const SQLITE_SCHEMA_VERSION: &str = "agentperf.v1.sqlite.v1";
pub const VIEWINGS_TABLE: &str = "viewings";
pub const PROSPECTS_TABLE: &str = "prospects";
pub const SCHEMA_META_TABLE: &str = "agentperf_schema_meta";

/// Prospect status marking a signed tenancy.
pub const TENANT_STATUS_CURRENT: &str = "Current";

// Column names and the day-first date format mirror the upstream store; this
// layer owns the DDL only so a fresh database file is usable immediately.
const CREATE_VIEWINGS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS viewings (
    personId TEXT,
    Agent TEXT NOT NULL,
    Date TEXT NOT NULL
);
"#;

const CREATE_PROSPECTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS prospects (
    personId TEXT NOT NULL,
    Applied TEXT,
    Status TEXT
);
"#;

const CREATE_INDEX_VIEWINGS_PERSON_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_viewings_person
ON viewings (personId);
"#;

const CREATE_INDEX_VIEWINGS_AGENT_DATE_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_viewings_agent_date
ON viewings (Agent, Date);
"#;

const CREATE_INDEX_PROSPECTS_PERSON_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_prospects_person
ON prospects (personId);
"#;

const CREATE_META_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS agentperf_schema_meta (
    schema_version TEXT NOT NULL,
    applied_at_utc TEXT NOT NULL
);
"#;

// Viewings without a person identifier are excluded entirely: they count
// toward nothing and raise nothing. The left join keeps viewings whose person
// never entered the prospect pipeline.
const LOAD_VIEWINGS_SQL: &str = r#"
SELECT v.personId, v.Agent, v.Date, p.Applied, p.Status
FROM viewings v
LEFT JOIN prospects p ON p.personId = v.personId
WHERE v.personId IS NOT NULL
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceErrorKind {
    StoreUnavailable,
    QueryFailed,
    MalformedDate,
}

impl DataSourceErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoreUnavailable => "store_unavailable",
            Self::QueryFailed => "query_failed",
            Self::MalformedDate => "malformed_date",
        }
    }
}

/// Fatal failure of the data source adapter: the store is unreachable, the
/// aggregation query failed, or a stored viewing date does not parse. Never
/// used for empty results, which are valid states.
#[derive(Debug)]
pub struct DataSourceError {
    pub kind: DataSourceErrorKind,
    pub detail: String,
}

impl DataSourceError {
    #[must_use]
    pub fn new(kind: DataSourceErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl Display for DataSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "data source failure ({}): {}",
            self.kind.as_str(),
            self.detail
        )
    }
}

impl std::error::Error for DataSourceError {}

#[must_use]
pub fn schema_statements() -> &'static [&'static str] {
    &[
        CREATE_VIEWINGS_TABLE_SQL,
        CREATE_PROSPECTS_TABLE_SQL,
        CREATE_INDEX_VIEWINGS_PERSON_SQL,
        CREATE_INDEX_VIEWINGS_AGENT_DATE_SQL,
        CREATE_INDEX_PROSPECTS_PERSON_SQL,
        CREATE_META_TABLE_SQL,
    ]
}

#[must_use]
pub fn create_schema_sql() -> String {
    schema_statements().join("\n")
}

pub fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|error| {
            store_unavailable(format!(
                "failed to create store parent directory {}: {error}",
                parent.display()
            ))
        })?;
    }

    Connection::open(path).map_err(|error| {
        store_unavailable(format!(
            "failed to open sqlite store {}: {error}",
            path.display()
        ))
    })
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&create_schema_sql())
        .map_err(|error| store_unavailable(format!("failed to create store schema: {error}")))?;

    if schema_meta_has_version(connection, SQLITE_SCHEMA_VERSION)? {
        return Ok(());
    }

    let applied_at_utc = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
    connection
        .execute(
            &format!(
                "INSERT INTO {SCHEMA_META_TABLE} (schema_version, applied_at_utc) VALUES (?1, ?2)"
            ),
            rusqlite::params![SQLITE_SCHEMA_VERSION, applied_at_utc],
        )
        .map_err(|error| store_unavailable(format!("failed to write schema meta row: {error}")))?;

    Ok(())
}

fn schema_meta_has_version(connection: &Connection, schema_version: &str) -> Result<bool> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {SCHEMA_META_TABLE} WHERE schema_version = ?1 LIMIT 1)"
    );
    let exists = connection
        .query_row(&query, [schema_version], |row| row.get::<usize, i64>(0))
        .map_err(|error| store_unavailable(format!("failed to query schema meta: {error}")))?;
    Ok(exists != 0)
}

struct ViewingRow {
    person_id: String,
    agent: String,
    date_raw: String,
    applied: Option<String>,
    status: Option<String>,
}

#[derive(Default)]
struct WeekBucket {
    persons: BTreeSet<String>,
    applicants: BTreeSet<String>,
    tenants: BTreeSet<String>,
}

/// Runs the aggregation over the raw viewings log: distinct persons per
/// (agent, Monday-start week), qualified by prospect pipeline state, with the
/// three conversion rates rounded to one decimal. Output is ordered by
/// `week_start` ascending, then `agent`.
pub fn load_weekly_metrics(connection: &Connection) -> Result<Vec<WeeklyMetric>> {
    let mut statement = connection
        .prepare(LOAD_VIEWINGS_SQL)
        .map_err(|error| query_failed(format!("failed to prepare viewings query: {error}")))?;
    let rows = statement
        .query_map([], |row| {
            Ok(ViewingRow {
                person_id: row.get(0)?,
                agent: row.get(1)?,
                date_raw: row.get(2)?,
                applied: row.get(3)?,
                status: row.get(4)?,
            })
        })
        .map_err(|error| query_failed(format!("failed to execute viewings query: {error}")))?;

    let mut buckets: BTreeMap<(time::Date, String), WeekBucket> = BTreeMap::new();
    for row in rows {
        let row =
            row.map_err(|error| query_failed(format!("failed to decode viewing row: {error}")))?;
        let viewing_date = parse_viewing_date(&row.date_raw).map_err(|error| {
            Error::new(DataSourceError::new(
                DataSourceErrorKind::MalformedDate,
                format!("agent {}: {error:#}", row.agent),
            ))
        })?;

        let week_start = week_start_of(viewing_date);
        let bucket = buckets.entry((week_start, row.agent)).or_default();
        bucket.persons.insert(row.person_id.clone());
        if row.applied.is_some() {
            bucket.applicants.insert(row.person_id.clone());
        }
        if row.status.as_deref() == Some(TENANT_STATUS_CURRENT) {
            bucket.tenants.insert(row.person_id);
        }
    }

    let metrics = buckets
        .into_iter()
        .map(|((week_start, agent), bucket)| {
            let total_viewings = bucket.persons.len() as u64;
            let applications = bucket.applicants.len() as u64;
            let tenants = bucket.tenants.len() as u64;
            WeeklyMetric {
                agent,
                week_start,
                week_end: week_end_of(week_start),
                total_viewings,
                applications,
                tenants,
                view_to_app_rate: rate(applications, total_viewings),
                app_to_tenant_rate: rate(tenants, applications),
                total_conversion_rate: rate(tenants, total_viewings),
            }
        })
        .collect();

    Ok(metrics)
}

fn store_unavailable(detail: String) -> Error {
    Error::new(DataSourceError::new(
        DataSourceErrorKind::StoreUnavailable,
        detail,
    ))
}

fn query_failed(detail: String) -> Error {
    Error::new(DataSourceError::new(
        DataSourceErrorKind::QueryFailed,
        detail,
    ))
}
