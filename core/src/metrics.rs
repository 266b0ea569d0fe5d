//! Metric engine: filters, aggregates and rankings over a `ClaimDataset`.
//!
//! Every function here is pure: it borrows the dataset, never mutates it,
//! and returns the same output for the same input. Operations that need a
//! column the source did not provide return `Metric::Unavailable` instead
//! of failing. Nothing reads the system clock; ages take `today` explicitly.

use crate::{
    model::{ClaimDataset, ClaimRecord, Column},
    params::{CreditScoreFilter, FraudThreshold},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ── Constants ────────────────────────────────────────────────────────────────

/// Claims at or above this amount always go to the validation queue.
pub const HIGH_VALUE_THRESHOLD: f64 = 20_000.0;

/// Statuses that put a claim in the validation queue regardless of amount.
pub const REVIEW_STATUSES: [&str; 3] = ["Open", "In Investigation", "Denied"];

/// Size of the high-risk customer ranking.
pub const TOP_N: usize = 10;

// ── Metric result ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "column", rename_all = "snake_case")]
pub enum Unavailable {
    MissingColumn(Column),
    /// The column exists but holds no usable value.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Value(T),
    Unavailable(Unavailable),
}

impl<T> Metric<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Unavailable(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Unavailable(_) => None,
        }
    }

    /// Degrade to `fallback` when unavailable.
    pub fn value_or(self, fallback: T) -> T {
        self.into_value().unwrap_or(fallback)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metric<U> {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            Metric::Unavailable(u) => Metric::Unavailable(u),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

fn require(ds: &ClaimDataset, column: Column) -> Result<(), Unavailable> {
    if ds.has(column) {
        Ok(())
    } else {
        Err(Unavailable::MissingColumn(column))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ── Threshold filter ─────────────────────────────────────────────────────────

/// Claims whose fraud probability is at least `threshold`, optionally
/// restricted to credit scores strictly below the filter's ceiling.
/// Sorted by fraud probability, highest first; equal probabilities keep
/// source order.
///
/// The credit ceiling is ignored when the dataset has no credit score column.
pub fn high_priority_claims<'a>(
    ds: &'a ClaimDataset,
    threshold: FraudThreshold,
    credit: CreditScoreFilter,
) -> Metric<Vec<&'a ClaimRecord>> {
    if let Err(u) = require(ds, Column::FraudProbability) {
        return Metric::Unavailable(u);
    }
    let ceiling = credit.ceiling().filter(|_| ds.has(Column::CreditScore));
    let t = threshold.value();

    let mut rows: Vec<&ClaimRecord> = ds
        .records
        .iter()
        .filter(|r| r.fraud_probability.is_some_and(|p| p >= t))
        .filter(|r| match ceiling {
            Some(limit) => r.credit_score.is_some_and(|s| s < limit),
            None => true,
        })
        .collect();

    rows.sort_by(|a, b| {
        let pa = a.fraud_probability.unwrap_or(f64::NEG_INFINITY);
        let pb = b.fraud_probability.unwrap_or(f64::NEG_INFINITY);
        pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
    });
    Metric::Value(rows)
}

// ── Aggregate counters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimTotals {
    pub total_claims: usize,
    pub confirmed_fraud: Metric<u64>,
    pub mean_fraud_probability: Metric<f64>,
    pub total_claim_amount: Metric<f64>,
    pub mean_claim_amount: Metric<f64>,
    /// Confirmed fraud as a percentage of all claims.
    pub confirmed_fraud_rate_pct: Metric<f64>,
}

pub fn confirmed_fraud_count(records: &[ClaimRecord]) -> u64 {
    records.iter().filter(|r| r.is_fraudulent == Some(true)).count() as u64
}

pub fn claim_totals(ds: &ClaimDataset) -> ClaimTotals {
    let total = ds.len();

    let confirmed_fraud = match require(ds, Column::IsFraudulentFlag) {
        Ok(()) => Metric::Value(confirmed_fraud_count(&ds.records)),
        Err(u) => Metric::Unavailable(u),
    };

    let mean_fraud_probability = match require(ds, Column::FraudProbability) {
        Ok(()) => match mean(ds.records.iter().filter_map(|r| r.fraud_probability)) {
            Some(m) => Metric::Value(m),
            None => Metric::Unavailable(Unavailable::NoData),
        },
        Err(u) => Metric::Unavailable(u),
    };

    let total_claim_amount = match require(ds, Column::ClaimAmountRequested) {
        Ok(()) => Metric::Value(ds.records.iter().filter_map(|r| r.claim_amount).sum::<f64>()),
        Err(u) => Metric::Unavailable(u),
    };

    // Averaged over every row, not just rows with a known amount.
    let mean_claim_amount = total_claim_amount
        .clone()
        .map(|sum| if total > 0 { sum / total as f64 } else { 0.0 });

    let confirmed_fraud_rate_pct = confirmed_fraud.clone().map(|n| {
        if total > 0 {
            n as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    });

    ClaimTotals {
        total_claims: total,
        confirmed_fraud,
        mean_fraud_probability,
        total_claim_amount,
        mean_claim_amount,
        confirmed_fraud_rate_pct,
    }
}

// ── Group-by count ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// `None` groups rows whose status is unknown.
    pub status: Option<String>,
    pub count: usize,
}

/// Row count per settlement status, ordered by status. Counts always sum
/// to the dataset length.
pub fn status_mix(ds: &ClaimDataset) -> Metric<Vec<StatusCount>> {
    if let Err(u) = require(ds, Column::SettlementStatus) {
        return Metric::Unavailable(u);
    }
    let mut counts: BTreeMap<Option<&str>, usize> = BTreeMap::new();
    for r in &ds.records {
        *counts.entry(r.settlement_status.as_deref()).or_insert(0) += 1;
    }
    Metric::Value(
        counts
            .into_iter()
            .map(|(status, count)| StatusCount { status: status.map(str::to_string), count })
            .collect(),
    )
}

// ── Top-N ranking ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRisk {
    pub policyholder_name: String,
    pub claims: usize,
    pub total_claim_value: f64,
    pub avg_fraud_probability: Option<f64>,
}

/// Policyholders ranked by claim count, then summed claim value, both
/// descending. At most `TOP_N` entries. Remaining ties are broken by name
/// ascending.
pub fn top_risk_customers(ds: &ClaimDataset) -> Metric<Vec<CustomerRisk>> {
    if let Err(u) = require(ds, Column::PolicyholderName) {
        return Metric::Unavailable(u);
    }

    struct Acc {
        claims: usize,
        total: f64,
        prob_sum: f64,
        prob_n: usize,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in &ds.records {
        let Some(name) = r.policyholder_name.as_deref() else {
            continue;
        };
        let acc = groups.entry(name).or_insert(Acc { claims: 0, total: 0.0, prob_sum: 0.0, prob_n: 0 });
        acc.claims += 1;
        acc.total += r.claim_amount.unwrap_or(0.0);
        if let Some(p) = r.fraud_probability {
            acc.prob_sum += p;
            acc.prob_n += 1;
        }
    }

    let mut ranked: Vec<CustomerRisk> = groups
        .into_iter()
        .map(|(name, acc)| CustomerRisk {
            policyholder_name: name.to_string(),
            claims: acc.claims,
            total_claim_value: acc.total,
            avg_fraud_probability: (acc.prob_n > 0).then(|| acc.prob_sum / acc.prob_n as f64),
        })
        .collect();

    // Stable sort over name-ordered groups.
    ranked.sort_by(|a, b| {
        b.claims.cmp(&a.claims).then_with(|| {
            b.total_claim_value
                .partial_cmp(&a.total_claim_value)
                .unwrap_or(Ordering::Equal)
        })
    });
    ranked.truncate(TOP_N);
    Metric::Value(ranked)
}

// ── Validation queue ─────────────────────────────────────────────────────────

pub fn is_high_value(record: &ClaimRecord) -> bool {
    record.claim_amount.is_some_and(|a| a >= HIGH_VALUE_THRESHOLD)
}

pub fn is_reviewable_status(record: &ClaimRecord) -> bool {
    record
        .settlement_status
        .as_deref()
        .is_some_and(|s| REVIEW_STATUSES.contains(&s))
}

/// Claims needing manager validation: high value or a reviewable status.
/// Ordered by status ascending, then amount descending; unknown values sort
/// last within each key.
pub fn validation_queue(ds: &ClaimDataset) -> Vec<&ClaimRecord> {
    let by_amount = ds.has(Column::ClaimAmountRequested);
    let by_status = ds.has(Column::SettlementStatus);

    let mut queue: Vec<&ClaimRecord> = ds
        .records
        .iter()
        .filter(|r| (by_amount && is_high_value(r)) || (by_status && is_reviewable_status(r)))
        .collect();

    queue.sort_by(|a, b| {
        let status = match (a.settlement_status.as_deref(), b.settlement_status.as_deref()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        status.then_with(|| match (a.claim_amount, b.claim_amount) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    });
    queue
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub pending_validation: usize,
    pub open: usize,
    pub in_investigation: usize,
    /// Mean days since submission over claims with a known date.
    pub avg_age_days: Option<f64>,
}

pub fn queue_summary(queue: &[&ClaimRecord], today: NaiveDate) -> QueueSummary {
    let status_contains = |needle: &str| {
        queue
            .iter()
            .filter(|r| {
                r.settlement_status
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(needle))
            })
            .count()
    };
    QueueSummary {
        pending_validation: queue.len(),
        open: status_contains("open"),
        in_investigation: status_contains("investigation"),
        avg_age_days: mean(queue.iter().filter_map(|r| days_since_submission(r, today)).map(|d| d as f64)),
    }
}

// ── Ages ─────────────────────────────────────────────────────────────────────

/// Whole days from submission to `today`. Negative for future-dated claims;
/// `None` when the submission date is unknown.
pub fn days_since_submission(record: &ClaimRecord, today: NaiveDate) -> Option<i64> {
    record.submission_date.map(|d| (today - d).num_days())
}

// ── Status tone ──────────────────────────────────────────────────────────────

/// Presentation class of a settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Investigation,
    Open,
    Settled,
    Denied,
    Generic,
}

impl StatusTone {
    pub fn of(status: Option<&str>) -> Self {
        let s = status.unwrap_or_default().to_lowercase();
        if s.contains("investigation") {
            Self::Investigation
        } else if s.contains("open") {
            Self::Open
        } else if s.contains("settled") {
            Self::Settled
        } else if s.contains("denied") {
            Self::Denied
        } else {
            Self::Generic
        }
    }

    /// Short marker used in text tables.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Investigation => "!!",
            Self::Open => "o ",
            Self::Settled => "ok",
            Self::Denied => "x ",
            Self::Generic => "- ",
        }
    }
}
