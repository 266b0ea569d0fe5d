use crate::params::{CreditScoreFilter, FraudThreshold, Screen};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_VIEW: &str = "V_FRAUD_ANALYTICS_DASHBOARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub db_path: String,
    pub view_name: String,
    /// Upper bound on how long a fetch waits for the database.
    pub connect_timeout_secs: u64,
    pub pool_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            db_path: "claims.db".into(),
            view_name: DEFAULT_VIEW.into(),
            connect_timeout_secs: 10,
            pool_size: 2,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Initial values of the user-facing controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDefaults {
    pub fraud_threshold: FraudThreshold,
    pub credit_filter: CreditScoreFilter,
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    /// How long a loaded dataset is reused before the next render refetches.
    pub cache_ttl_secs: u64,
    pub defaults: ReportDefaults,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            cache_ttl_secs: 600,
            defaults: ReportDefaults::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Keys left out fall back to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        if config.source.pool_size == 0 {
            anyhow::bail!("Invalid config {path}: source.pool_size must be at least 1");
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
