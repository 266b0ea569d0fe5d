//! A dashboard session: one data source, one dataset cache, many renders.
//!
//! A render pass is: load (or reuse) the dataset → build the requested
//! screen. If the load fails the pass is abandoned with that error; there is
//! no retry and no partial report.

use crate::{
    cache::DatasetCache,
    config::DashboardConfig,
    error::DashResult,
    model::ClaimDataset,
    params::{CreditScoreFilter, FraudThreshold, Screen},
    screens::{build_report, ReportParams, ScreenReport},
    source::{ClaimSource, SqliteSource},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub type SessionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub screen: Screen,
    pub threshold: FraudThreshold,
    pub credit_filter: CreditScoreFilter,
    pub today: NaiveDate,
}

pub struct DashboardSession<S: ClaimSource> {
    pub id: SessionId,
    source: S,
    view_name: String,
    cache: DatasetCache,
}

impl DashboardSession<SqliteSource> {
    /// Session over the SQLite view named in `config`.
    pub fn open(config: &DashboardConfig) -> DashResult<Self> {
        let source = SqliteSource::new(&config.source)?;
        Ok(Self::new(source, &config.source.view_name, config.cache_ttl()))
    }
}

impl<S: ClaimSource> DashboardSession<S> {
    pub fn new(source: S, view_name: &str, cache_ttl: Duration) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        log::info!("session={id} opened over {}", source.describe());
        Self {
            id,
            source,
            view_name: view_name.to_string(),
            cache: DatasetCache::new(cache_ttl),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn dataset(&mut self) -> DashResult<Arc<ClaimDataset>> {
        self.cache.get_or_load(&self.source)
    }

    /// Drop the cached dataset and load it again. Returns the row count.
    pub fn refresh(&mut self) -> DashResult<usize> {
        self.cache.invalidate();
        Ok(self.dataset()?.len())
    }

    pub fn render(&mut self, request: &RenderRequest) -> DashResult<ScreenReport> {
        let dataset = self.dataset()?;
        let params = ReportParams {
            view_name: self.view_name.clone(),
            threshold: request.threshold,
            credit_filter: request.credit_filter,
            today: request.today,
        };
        log::info!(
            "session={} render {} over {} claims",
            self.id,
            request.screen.slug(),
            dataset.len()
        );
        Ok(build_report(request.screen, &dataset, &params))
    }
}
