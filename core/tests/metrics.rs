use chrono::NaiveDate;
use seguropar_core::{
    metrics::{
        self, Metric, StatusCount, StatusTone, Unavailable, HIGH_VALUE_THRESHOLD, TOP_N,
    },
    model::{ClaimDataset, ClaimRecord, Column},
    params::{CreditScoreFilter, FraudThreshold},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn ds(columns: &[Column], records: Vec<ClaimRecord>) -> ClaimDataset {
    ClaimDataset { columns: columns.iter().copied().collect(), records }
}

fn all_columns(records: Vec<ClaimRecord>) -> ClaimDataset {
    ds(&Column::ALL, records)
}

fn scored(id: &str, prob: Option<f64>, credit: Option<i64>) -> ClaimRecord {
    ClaimRecord {
        claim_id: Some(id.into()),
        fraud_probability: prob,
        credit_score: credit,
        ..Default::default()
    }
}

fn queued(id: &str, status: Option<&str>, amount: Option<f64>) -> ClaimRecord {
    ClaimRecord {
        claim_id: Some(id.into()),
        settlement_status: status.map(str::to_string),
        claim_amount: amount,
        ..Default::default()
    }
}

fn ids(rows: &[&ClaimRecord]) -> Vec<String> {
    rows.iter().map(|r| r.claim_id.clone().unwrap_or_default()).collect()
}

fn threshold(t: f64) -> FraudThreshold {
    FraudThreshold::new(t).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Threshold filter ─────────────────────────────────────────────────────────

#[test]
fn threshold_and_credit_example() {
    let data = all_columns(vec![
        scored("1", Some(0.9), Some(650)),
        scored("2", Some(0.5), Some(500)),
        scored("3", Some(0.8), Some(750)),
    ]);

    let high = metrics::high_priority_claims(&data, threshold(0.75), CreditScoreFilter::All);
    assert_eq!(ids(high.value().unwrap()), vec!["1", "3"]);

    let risky = metrics::high_priority_claims(&data, threshold(0.75), CreditScoreFilter::Below700);
    assert_eq!(ids(risky.value().unwrap()), vec!["1"]);

    let very_risky = metrics::high_priority_claims(&data, threshold(0.75), CreditScoreFilter::Below600);
    assert!(very_risky.value().unwrap().is_empty());
}

#[test]
fn threshold_selects_exactly_rows_at_or_above() {
    let probs = [0.0, 0.1, 0.25, 0.5, 0.5, 0.74, 0.75, 0.9, 1.0];
    let mut records: Vec<ClaimRecord> = probs
        .iter()
        .enumerate()
        .map(|(i, p)| scored(&i.to_string(), Some(*p), Some(600)))
        .collect();
    records.push(scored("unknown", None, Some(600)));
    let data = all_columns(records);

    for step in 0..=20 {
        let t = step as f64 / 20.0;
        let got = metrics::high_priority_claims(&data, threshold(t), CreditScoreFilter::All).value_or(vec![]);
        let mut got_ids = ids(&got);
        got_ids.sort();
        let mut want: Vec<String> = data
            .records
            .iter()
            .filter(|r| r.fraud_probability.is_some_and(|p| p >= t))
            .map(|r| r.claim_id.clone().unwrap())
            .collect();
        want.sort();
        assert_eq!(got_ids, want, "threshold {t}");
    }

    let everything = metrics::high_priority_claims(&data, threshold(0.0), CreditScoreFilter::All);
    assert_eq!(everything.value().unwrap().len(), probs.len());

    let certain = metrics::high_priority_claims(&data, threshold(1.0), CreditScoreFilter::All);
    assert_eq!(ids(certain.value().unwrap()), vec!["8"]);
}

#[test]
fn high_priority_sorted_by_probability_with_stable_ties() {
    let data = all_columns(vec![
        scored("a", Some(0.8), None),
        scored("b", Some(0.95), None),
        scored("c", Some(0.8), None),
        scored("d", Some(0.99), None),
    ]);
    let rows = metrics::high_priority_claims(&data, threshold(0.5), CreditScoreFilter::All);
    assert_eq!(ids(rows.value().unwrap()), vec!["d", "b", "a", "c"]);
}

#[test]
fn credit_ceiling_excludes_unknown_scores_and_is_strict() {
    let data = all_columns(vec![
        scored("1", Some(0.9), Some(599)),
        scored("2", Some(0.9), Some(600)),
        scored("3", Some(0.9), None),
    ]);
    let rows = metrics::high_priority_claims(&data, threshold(0.75), CreditScoreFilter::Below600);
    assert_eq!(ids(rows.value().unwrap()), vec!["1"]);
}

#[test]
fn credit_ceiling_ignored_without_credit_column() {
    let data = ds(
        &[Column::ClaimId, Column::FraudProbability],
        vec![scored("1", Some(0.9), None), scored("2", Some(0.8), None)],
    );
    let rows = metrics::high_priority_claims(&data, threshold(0.75), CreditScoreFilter::Below550);
    assert_eq!(ids(rows.value().unwrap()), vec!["1", "2"]);
}

#[test]
fn high_priority_unavailable_without_probability_column() {
    let data = ds(&[Column::ClaimId, Column::CreditScore], vec![scored("1", None, Some(500))]);
    let rows = metrics::high_priority_claims(&data, threshold(0.5), CreditScoreFilter::All);
    assert_eq!(rows, Metric::Unavailable(Unavailable::MissingColumn(Column::FraudProbability)));
}

// ── Aggregates ───────────────────────────────────────────────────────────────

fn portfolio() -> ClaimDataset {
    let row = |id: &str, prob: f64, amount: Option<f64>, fraud: Option<bool>| ClaimRecord {
        claim_id: Some(id.into()),
        fraud_probability: Some(prob),
        claim_amount: amount,
        is_fraudulent: fraud,
        ..Default::default()
    };
    all_columns(vec![
        row("1", 0.9, Some(10_000.0), Some(true)),
        row("2", 0.2, Some(2_000.0), Some(false)),
        row("3", 0.7, None, None),
        row("4", 0.6, Some(8_000.0), Some(true)),
    ])
}

#[test]
fn totals_over_whole_dataset() {
    let totals = metrics::claim_totals(&portfolio());
    assert_eq!(totals.total_claims, 4);
    assert_eq!(totals.confirmed_fraud, Metric::Value(2));
    let mean_prob = totals.mean_fraud_probability.value_or(f64::NAN);
    assert!((mean_prob - 0.6).abs() < 1e-12, "mean prob {mean_prob}");
    assert_eq!(totals.total_claim_amount, Metric::Value(20_000.0));
    // Averaged over all four rows, including the one without an amount.
    assert_eq!(totals.mean_claim_amount, Metric::Value(5_000.0));
    assert_eq!(totals.confirmed_fraud_rate_pct, Metric::Value(50.0));
}

#[test]
fn confirmed_fraud_unaffected_by_threshold_filtering() {
    let data = portfolio();
    let snapshot = data.clone();
    let before = metrics::claim_totals(&data).confirmed_fraud;

    for t in [0.0, 0.3, 0.75, 1.0] {
        let rows = metrics::high_priority_claims(&data, threshold(t), CreditScoreFilter::All).value_or(vec![]);
        let flagged_in_subset = rows.iter().filter(|r| r.is_fraudulent == Some(true)).count() as u64;
        assert!(flagged_in_subset <= metrics::confirmed_fraud_count(&data.records));
        assert_eq!(metrics::claim_totals(&data).confirmed_fraud, before);
    }
    assert_eq!(data, snapshot, "metric engine mutated the dataset");
}

#[test]
fn totals_degrade_when_columns_missing() {
    let data = ds(&[Column::ClaimId], vec![scored("1", None, None), scored("2", None, None)]);
    let totals = metrics::claim_totals(&data);
    assert_eq!(totals.total_claims, 2);
    assert_eq!(totals.confirmed_fraud, Metric::Unavailable(Unavailable::MissingColumn(Column::IsFraudulentFlag)));
    assert_eq!(
        totals.mean_fraud_probability,
        Metric::Unavailable(Unavailable::MissingColumn(Column::FraudProbability))
    );
    assert_eq!(totals.total_claim_amount.clone().value_or(0.0), 0.0);
    assert!(!totals.mean_claim_amount.is_available());
    assert_eq!(totals.confirmed_fraud.value_or(0), 0);
}

#[test]
fn mean_probability_without_values_is_no_data() {
    let data = all_columns(vec![scored("1", None, None)]);
    let totals = metrics::claim_totals(&data);
    assert_eq!(totals.mean_fraud_probability, Metric::Unavailable(Unavailable::NoData));

    let empty = all_columns(vec![]);
    let totals = metrics::claim_totals(&empty);
    assert_eq!(totals.total_claims, 0);
    assert_eq!(totals.mean_claim_amount, Metric::Value(0.0));
    assert_eq!(totals.confirmed_fraud_rate_pct, Metric::Value(0.0));
}

// ── Status mix ───────────────────────────────────────────────────────────────

#[test]
fn status_mix_example() {
    let data = all_columns(vec![
        queued("1", Some("Open"), None),
        queued("2", Some("Open"), None),
        queued("3", Some("Settled"), None),
    ]);
    let mix = metrics::status_mix(&data).value_or(vec![]);
    assert_eq!(
        mix,
        vec![
            StatusCount { status: Some("Open".into()), count: 2 },
            StatusCount { status: Some("Settled".into()), count: 1 },
        ]
    );
}

#[test]
fn status_mix_sums_to_total_including_unknown() {
    let data = all_columns(vec![
        queued("1", Some("Denied"), None),
        queued("2", None, None),
        queued("3", Some("In Investigation"), None),
        queued("4", Some("Denied"), None),
        queued("5", None, None),
    ]);
    let mix = metrics::status_mix(&data).value_or(vec![]);
    assert_eq!(mix.iter().map(|s| s.count).sum::<usize>(), data.len());
    assert_eq!(mix[0], StatusCount { status: None, count: 2 });
    assert_eq!(mix[1].status.as_deref(), Some("Denied"));
}

#[test]
fn status_mix_unavailable_without_status_column() {
    let data = ds(&[Column::ClaimId], vec![queued("1", None, None)]);
    assert_eq!(
        metrics::status_mix(&data),
        Metric::Unavailable(Unavailable::MissingColumn(Column::SettlementStatus))
    );
}

// ── Top-N ────────────────────────────────────────────────────────────────────

fn customer_claim(name: &str, amount: f64, prob: Option<f64>) -> ClaimRecord {
    ClaimRecord {
        policyholder_name: Some(name.into()),
        claim_amount: Some(amount),
        fraud_probability: prob,
        ..Default::default()
    }
}

#[test]
fn top_customers_capped_and_ordered() {
    let mut records = Vec::new();
    for i in 0..15 {
        let name = format!("Customer {i:02}");
        for _ in 0..(i % 4 + 1) {
            records.push(customer_claim(&name, 1_000.0 * (i + 1) as f64, Some(0.5)));
        }
    }
    let ranked = metrics::top_risk_customers(&all_columns(records)).value_or(vec![]);
    assert_eq!(ranked.len(), TOP_N);
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.claims >= b.claims, "claims not non-increasing: {a:?} then {b:?}");
        if a.claims == b.claims {
            assert!(a.total_claim_value >= b.total_claim_value, "tie not broken by value: {a:?} then {b:?}");
        }
    }
    assert_eq!(ranked[0].policyholder_name, "Customer 11");
    assert_eq!(ranked[0].claims, 4);
}

#[test]
fn top_customers_aggregates_per_group() {
    let data = all_columns(vec![
        customer_claim("Ana Rojas", 1_000.0, Some(0.2)),
        customer_claim("Ana Rojas", 3_000.0, Some(0.6)),
        customer_claim("Luis Vera", 9_000.0, None),
        ClaimRecord { policyholder_name: None, claim_amount: Some(99_000.0), ..Default::default() },
    ]);
    let ranked = metrics::top_risk_customers(&data).value_or(vec![]);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].policyholder_name, "Ana Rojas");
    assert_eq!(ranked[0].claims, 2);
    assert_eq!(ranked[0].total_claim_value, 4_000.0);
    assert!((ranked[0].avg_fraud_probability.unwrap() - 0.4).abs() < 1e-12);
    assert_eq!(ranked[1].avg_fraud_probability, None);
}

#[test]
fn top_customers_full_ties_fall_back_to_name() {
    let data = all_columns(vec![
        customer_claim("Zoe", 500.0, None),
        customer_claim("Adan", 500.0, None),
        customer_claim("Maria", 500.0, None),
    ]);
    let names: Vec<String> = metrics::top_risk_customers(&data)
        .value_or(vec![])
        .into_iter()
        .map(|c| c.policyholder_name)
        .collect();
    assert_eq!(names, vec!["Adan", "Maria", "Zoe"]);
}

#[test]
fn top_customers_unavailable_without_name_column() {
    let data = ds(&[Column::ClaimAmountRequested], vec![customer_claim("x", 1.0, None)]);
    assert_eq!(
        metrics::top_risk_customers(&data),
        Metric::Unavailable(Unavailable::MissingColumn(Column::PolicyholderName))
    );
}

// ── Validation queue ─────────────────────────────────────────────────────────

fn queue_fixture() -> ClaimDataset {
    all_columns(vec![
        queued("settled-small", Some("Settled"), Some(5_000.0)),
        queued("settled-big", Some("Settled"), Some(25_000.0)),
        queued("open-small", Some("Open"), Some(1_000.0)),
        queued("open-big", Some("Open"), Some(40_000.0)),
        queued("denied", Some("Denied"), Some(3_000.0)),
        queued("investigation", Some("In Investigation"), None),
        queued("withdrawn-edge", Some("Withdrawn"), Some(HIGH_VALUE_THRESHOLD)),
        queued("withdrawn-below", Some("Withdrawn"), Some(19_999.99)),
        queued("open-lowercase", Some("open"), Some(100.0)),
        queued("no-status-big", None, Some(30_000.0)),
    ])
}

#[test]
fn validation_queue_membership_is_exact() {
    let data = queue_fixture();
    let queue = metrics::validation_queue(&data);
    let got: std::collections::BTreeSet<String> = ids(&queue).into_iter().collect();

    let want: std::collections::BTreeSet<String> = data
        .records
        .iter()
        .filter(|r| {
            r.claim_amount.is_some_and(|a| a >= 20_000.0)
                || matches!(r.settlement_status.as_deref(), Some("Open" | "In Investigation" | "Denied"))
        })
        .map(|r| r.claim_id.clone().unwrap())
        .collect();
    assert_eq!(got, want);
    assert!(!got.contains("open-lowercase"));
    assert!(got.contains("withdrawn-edge"));
    assert!(!got.contains("withdrawn-below"));
}

#[test]
fn validation_queue_ordered_by_status_then_amount_desc() {
    let data = queue_fixture();
    let queue = metrics::validation_queue(&data);
    assert_eq!(
        ids(&queue),
        vec![
            "denied",
            "investigation",
            "open-big",
            "open-small",
            "settled-big",
            "withdrawn-edge",
            "no-status-big",
        ]
    );
}

#[test]
fn validation_queue_degrades_per_missing_column() {
    let records = queue_fixture().records;

    let no_amount = ds(&[Column::ClaimId, Column::SettlementStatus], records.clone());
    let got = ids(&metrics::validation_queue(&no_amount));
    assert_eq!(got, vec!["denied", "investigation", "open-big", "open-small"]);

    let no_status = ds(&[Column::ClaimId, Column::ClaimAmountRequested], records.clone());
    let got = ids(&metrics::validation_queue(&no_status));
    assert_eq!(got, vec!["open-big", "settled-big", "withdrawn-edge", "no-status-big"]);

    let neither = ds(&[Column::ClaimId], records);
    assert!(metrics::validation_queue(&neither).is_empty());
}

#[test]
fn queue_summary_counts_and_age() {
    let today = ymd(2025, 3, 31);
    let dated = |id: &str, status: &str, date: Option<NaiveDate>| ClaimRecord {
        claim_id: Some(id.into()),
        settlement_status: Some(status.into()),
        submission_date: date,
        ..Default::default()
    };
    let data = all_columns(vec![
        dated("1", "Open", Some(ymd(2025, 3, 21))),
        dated("2", "In Investigation", Some(ymd(2025, 3, 1))),
        dated("3", "Denied", None),
    ]);
    let queue = metrics::validation_queue(&data);
    let summary = metrics::queue_summary(&queue, today);
    assert_eq!(summary.pending_validation, 3);
    assert_eq!(summary.open, 1);
    assert_eq!(summary.in_investigation, 1);
    assert_eq!(summary.avg_age_days, Some(20.0));

    let undated = all_columns(vec![dated("4", "Open", None)]);
    let queue = metrics::validation_queue(&undated);
    assert_eq!(metrics::queue_summary(&queue, today).avg_age_days, None);
}

// ── Ages & tones ─────────────────────────────────────────────────────────────

#[test]
fn age_uses_injected_today() {
    let record = ClaimRecord { submission_date: Some(ymd(2024, 12, 31)), ..Default::default() };
    assert_eq!(metrics::days_since_submission(&record, ymd(2025, 1, 10)), Some(10));
    assert_eq!(metrics::days_since_submission(&record, ymd(2024, 12, 31)), Some(0));
    assert_eq!(metrics::days_since_submission(&record, ymd(2024, 12, 30)), Some(-1));
    assert_eq!(metrics::days_since_submission(&ClaimRecord::default(), ymd(2025, 1, 10)), None);
}

#[test]
fn status_tones() {
    assert_eq!(StatusTone::of(Some("In Investigation")), StatusTone::Investigation);
    assert_eq!(StatusTone::of(Some("Reopened")), StatusTone::Open);
    assert_eq!(StatusTone::of(Some("SETTLED")), StatusTone::Settled);
    assert_eq!(StatusTone::of(Some("Denied")), StatusTone::Denied);
    assert_eq!(StatusTone::of(Some("Withdrawn")), StatusTone::Generic);
    assert_eq!(StatusTone::of(None), StatusTone::Generic);
}
