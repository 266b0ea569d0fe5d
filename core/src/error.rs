use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Data source '{source_path}' unavailable: {reason}")]
    SourceUnavailable { source_path: String, reason: String },

    #[error("Invalid view name '{name}': expected a plain SQL identifier")]
    InvalidViewName { name: String },

    #[error("Fraud threshold {value} outside [0.00, 1.00]")]
    InvalidThreshold { value: f64 },

    #[error("Unknown screen '{name}' (expected fraud-analyst, executive or claims-manager)")]
    UnknownScreen { name: String },

    #[error("Unknown credit score filter '{name}' (expected all, 700, 600 or 550)")]
    UnknownCreditFilter { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashboardError>;
