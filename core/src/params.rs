//! User-facing report parameters.

use crate::error::{DashResult, DashboardError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Fraud threshold ──────────────────────────────────────────────────────────

/// Minimum fraud probability for a claim to count as high priority.
/// Always within [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct FraudThreshold(f64);

impl FraudThreshold {
    pub const DEFAULT: FraudThreshold = FraudThreshold(0.75);

    pub fn new(value: f64) -> DashResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DashboardError::InvalidThreshold { value })
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for FraudThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'de> Deserialize<'de> for FraudThreshold {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        FraudThreshold::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for FraudThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ── Credit score filter ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditScoreFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "700")]
    Below700,
    #[serde(rename = "600")]
    Below600,
    #[serde(rename = "550")]
    Below550,
}

impl CreditScoreFilter {
    pub const ALL: [CreditScoreFilter; 4] = [
        CreditScoreFilter::All,
        CreditScoreFilter::Below700,
        CreditScoreFilter::Below600,
        CreditScoreFilter::Below550,
    ];

    /// Exclusive upper bound on credit score, `None` for no filter.
    pub fn ceiling(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Below700 => Some(700),
            Self::Below600 => Some(600),
            Self::Below550 => Some(550),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All scores",
            Self::Below700 => "< 700 (Moderate risk)",
            Self::Below600 => "< 600 (High risk)",
            Self::Below550 => "< 550 (Very high risk)",
        }
    }
}

impl FromStr for CreditScoreFilter {
    type Err = DashboardError;

    fn from_str(s: &str) -> DashResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "none" | "" => Ok(Self::All),
            "700" | "<700" => Ok(Self::Below700),
            "600" | "<600" => Ok(Self::Below600),
            "550" | "<550" => Ok(Self::Below550),
            _ => Err(DashboardError::UnknownCreditFilter { name: s.to_string() }),
        }
    }
}

// ── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    FraudAnalyst,
    #[serde(rename = "executive")]
    ExecutiveKpis,
    ClaimsManager,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::FraudAnalyst, Screen::ExecutiveKpis, Screen::ClaimsManager];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::FraudAnalyst => "fraud-analyst",
            Self::ExecutiveKpis => "executive",
            Self::ClaimsManager => "claims-manager",
        }
    }

    /// Navigation label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FraudAnalyst => "Fraud Analyst",
            Self::ExecutiveKpis => "Executive KPIs",
            Self::ClaimsManager => "Claims Manager",
        }
    }
}

impl FromStr for Screen {
    type Err = DashboardError;

    fn from_str(s: &str) -> DashResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "fraud-analyst" | "fraud" => Ok(Self::FraudAnalyst),
            "executive" | "executive-kpis" | "exec" => Ok(Self::ExecutiveKpis),
            "claims-manager" | "manager" => Ok(Self::ClaimsManager),
            _ => Err(DashboardError::UnknownScreen { name: s.to_string() }),
        }
    }
}
