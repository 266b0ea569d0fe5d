//! Session-scoped dataset cache.
//!
//! The dataset is fetched, normalized and held for `ttl`; renders inside
//! that window share the same `Arc<ClaimDataset>`. A failed load leaves the
//! cache empty; nothing partial is ever stored.

use crate::{
    error::DashResult,
    model::ClaimDataset,
    normalize::normalize_table,
    source::ClaimSource,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry {
    loaded_at: Instant,
    dataset: Arc<ClaimDataset>,
}

pub struct DatasetCache {
    ttl: Duration,
    entry: Option<Entry>,
}

impl DatasetCache {
    /// Empty cache; the first `get_or_load` fetches.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Cached dataset if younger than the TTL, otherwise a fresh load.
    pub fn get_or_load(&mut self, source: &dyn ClaimSource) -> DashResult<Arc<ClaimDataset>> {
        self.get_or_load_at(source, Instant::now())
    }

    /// As `get_or_load`, with the current instant supplied by the caller.
    pub fn get_or_load_at(&mut self, source: &dyn ClaimSource, now: Instant) -> DashResult<Arc<ClaimDataset>> {
        if let Some(entry) = &self.entry {
            if now.saturating_duration_since(entry.loaded_at) < self.ttl {
                return Ok(Arc::clone(&entry.dataset));
            }
            log::debug!("cache: dataset expired after {:?}", self.ttl);
        }
        self.entry = None;

        let raw = source.fetch()?;
        let dataset = Arc::new(ClaimDataset::from_table(&normalize_table(raw)));
        log::info!(
            "cache: loaded {} claims ({} known columns) from {}",
            dataset.len(),
            dataset.columns.len(),
            source.describe()
        );
        self.entry = Some(Entry { loaded_at: now, dataset: Arc::clone(&dataset) });
        Ok(dataset)
    }

    /// Forget the cached dataset; the next load refetches.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a dataset is held, expired or not.
    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }
}
