pub mod rankings;
pub mod schema;
pub mod summary;
pub mod trend;

use anyhow::Result;

use crate::cache::MetricsCache;
use crate::config::RuntimeConfig;
use crate::models::WeeklyMetric;

/// Opens the store, bootstraps the schema if missing, and loads the weekly
/// metrics table through a process-local cache. One invocation, one table.
pub(crate) fn load_weekly_metrics(config: &RuntimeConfig) -> Result<Vec<WeeklyMetric>> {
    let connection = crate::sqlite::open_connection(&config.db_path)?;
    crate::sqlite::ensure_schema(&connection)?;

    let mut cache = MetricsCache::new(config.cache_ttl);
    let metrics = cache.get_or_refresh(|| crate::sqlite::load_weekly_metrics(&connection))?;
    Ok(metrics.to_vec())
}
