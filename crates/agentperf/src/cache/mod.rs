use std::time::{Duration, Instant};

use anyhow::Result;

use crate::models::WeeklyMetric;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug)]
struct CachedTable {
    metrics: Vec<WeeklyMetric>,
    loaded_at: Instant,
}

/// Time-windowed memo of the weekly metrics table. Within the TTL every
/// caller reads the same immutable table; on expiry the stale table is
/// dropped before the refresh runs, so a failed reload can never hand out
/// rows older than the window.
#[derive(Debug)]
pub struct MetricsCache {
    ttl: Duration,
    state: Option<CachedTable>,
}

impl MetricsCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, state: None }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|table| table.loaded_at.elapsed() < self.ttl)
    }

    pub fn invalidate(&mut self) {
        self.state = None;
    }

    pub fn get_or_refresh<F>(&mut self, load: F) -> Result<&[WeeklyMetric]>
    where
        F: FnOnce() -> Result<Vec<WeeklyMetric>>,
    {
        if !self.is_fresh() {
            self.state = None;
            let metrics = load()?;
            self.state = Some(CachedTable {
                metrics,
                loaded_at: Instant::now(),
            });
        }

        Ok(self
            .state
            .as_ref()
            .map_or(&[], |table| table.metrics.as_slice()))
    }
}
