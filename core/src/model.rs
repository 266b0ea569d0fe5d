//! Claim data model.
//!
//! The source view is a wide, denormalized table whose exact column set is
//! not guaranteed. Raw rows arrive as a `RawTable` of loosely typed cells;
//! `ClaimDataset::from_table` maps the columns we know about onto an
//! explicit optional-field `ClaimRecord` and records which ones were present.

use crate::normalize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Raw table ────────────────────────────────────────────────────────────────

/// A single loosely typed value as returned by the data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Integer(v) => Some(v.to_string()),
            Cell::Real(v) if !v.is_finite() => None,
            Cell::Real(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some(format!("{}", *v as i64)),
            Cell::Real(v) => Some(v.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Integer(v) => *v as f64,
            Cell::Real(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Null | Cell::Date(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            Cell::Real(v) if v.is_finite() => Some(v.trunc() as i64),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            }
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Integer(v) => Some(*v != 0),
            Cell::Real(v) if v.is_finite() => Some(*v != 0.0),
            Cell::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "t" | "yes" | "y" => Some(true),
                "0" | "false" | "f" | "no" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Rows exactly as fetched: column names in source order, one `Vec<Cell>`
/// per row with the same width as `columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Rows must be as wide as `columns`; shorter rows read as nulls.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

// ── Columns ──────────────────────────────────────────────────────────────────

/// The columns of the dashboard view that the reports know how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    ClaimId,
    SubmissionDate,
    SettlementStatus,
    ClaimAmountRequested,
    FraudProbability,
    IsFraudulentFlag,
    PolicyholderId,
    PolicyholderName,
    CreditScore,
    EmploymentStatus,
    Vin,
    MakeName,
    ModelName,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::ClaimId,
        Column::SubmissionDate,
        Column::SettlementStatus,
        Column::ClaimAmountRequested,
        Column::FraudProbability,
        Column::IsFraudulentFlag,
        Column::PolicyholderId,
        Column::PolicyholderName,
        Column::CreditScore,
        Column::EmploymentStatus,
        Column::Vin,
        Column::MakeName,
        Column::ModelName,
    ];

    /// Column name as it appears in the source view.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClaimId => "Claim_ID",
            Self::SubmissionDate => "Submission_Date",
            Self::SettlementStatus => "Settlement_Status",
            Self::ClaimAmountRequested => "Claim_Amount_Requested",
            Self::FraudProbability => "Fraud_Probability",
            Self::IsFraudulentFlag => "Is_Fraudulent_Flag",
            Self::PolicyholderId => "Policyholder_ID",
            Self::PolicyholderName => "Policyholder_Name",
            Self::CreditScore => "Credit_Score",
            Self::EmploymentStatus => "Employment_Status",
            Self::Vin => "VIN",
            Self::MakeName => "Make_Name",
            Self::ModelName => "Model_Name",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

pub type ColumnSet = BTreeSet<Column>;

// ── Claim record ─────────────────────────────────────────────────────────────

/// One claim. `None` means the column was absent or the cell could not be
/// coerced; no field is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimRecord {
    pub claim_id: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub settlement_status: Option<String>,
    pub claim_amount: Option<f64>,
    pub fraud_probability: Option<f64>,
    pub is_fraudulent: Option<bool>,
    pub policyholder_id: Option<String>,
    pub policyholder_name: Option<String>,
    pub credit_score: Option<i64>,
    pub employment_status: Option<String>,
    pub vin: Option<String>,
    pub make_name: Option<String>,
    pub model_name: Option<String>,
}

impl ClaimRecord {
    fn set(&mut self, column: Column, cell: &Cell) {
        match column {
            Column::ClaimId => self.claim_id = cell.as_text(),
            Column::SubmissionDate => self.submission_date = normalize::coerce_date(cell),
            Column::SettlementStatus => self.settlement_status = cell.as_text(),
            Column::ClaimAmountRequested => self.claim_amount = cell.as_f64(),
            Column::FraudProbability => self.fraud_probability = cell.as_f64(),
            Column::IsFraudulentFlag => self.is_fraudulent = cell.as_bool(),
            Column::PolicyholderId => self.policyholder_id = cell.as_text(),
            Column::PolicyholderName => self.policyholder_name = cell.as_text(),
            Column::CreditScore => self.credit_score = cell.as_i64(),
            Column::EmploymentStatus => self.employment_status = cell.as_text(),
            Column::Vin => self.vin = cell.as_text(),
            Column::MakeName => self.make_name = cell.as_text(),
            Column::ModelName => self.model_name = cell.as_text(),
        }
    }
}

// ── Dataset ──────────────────────────────────────────────────────────────────

/// The normalized, immutable dataset every screen reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimDataset {
    pub columns: ColumnSet,
    pub records: Vec<ClaimRecord>,
}

impl ClaimDataset {
    /// Map the known columns of a (normalized) table onto claim records.
    /// Unknown columns are ignored; missing ones leave their field `None`.
    pub fn from_table(table: &RawTable) -> Self {
        let mapping: Vec<(usize, Column)> = table
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, name)| Column::from_name(name).map(|c| (i, c)))
            .collect();

        let columns: ColumnSet = mapping.iter().map(|(_, c)| *c).collect();
        for missing in Column::ALL.iter().filter(|c| !columns.contains(c)) {
            log::debug!("dataset: expected column {} not present", missing.name());
        }

        let records = table
            .rows
            .iter()
            .map(|row| {
                let mut record = ClaimRecord::default();
                for (idx, column) in &mapping {
                    if let Some(cell) = row.get(*idx) {
                        record.set(*column, cell);
                    }
                }
                record
            })
            .collect();

        Self { columns, records }
    }

    /// Whether the source provided this column.
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
