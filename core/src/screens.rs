//! The three dashboard screens.
//!
//! Each builder selects the metrics and columns its audience needs and
//! returns a `ScreenReport`: KPI tiles, tables and notices, already
//! formatted as display strings. Rendering to a terminal or JSON lives in
//! `render`.

use crate::{
    metrics::{self, ClaimTotals, Metric, StatusTone, Unavailable},
    model::{ClaimDataset, ClaimRecord, Column},
    params::{CreditScoreFilter, FraudThreshold, Screen},
    render::{fmt_fixed, fmt_money, fmt_pct},
};
use chrono::NaiveDate;
use serde::Serialize;

/// Everything a render pass needs besides the dataset.
#[derive(Debug, Clone)]
pub struct ReportParams {
    pub view_name: String,
    pub threshold: FraudThreshold,
    pub credit_filter: CreditScoreFilter,
    /// Reference date for claim ages.
    pub today: NaiveDate,
}

// ── Report types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub title: String,
    pub value: String,
    pub detail: String,
}

impl KpiTile {
    fn new(title: &str, value: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { title: title.to_string(), value: value.into(), detail: detail.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Kpis { tiles: Vec<KpiTile> },
    Table { heading: String, table: Table },
    Notice { heading: Option<String>, message: String },
    Notes { heading: String, items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    pub screen: Screen,
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

impl ScreenReport {
    pub fn tiles(&self) -> impl Iterator<Item = &KpiTile> {
        self.sections.iter().flat_map(|s| match s {
            Section::Kpis { tiles } => tiles.as_slice(),
            _ => &[][..],
        })
    }

    pub fn tile(&self, title: &str) -> Option<&KpiTile> {
        self.tiles().find(|t| t.title == title)
    }

    pub fn table(&self, heading: &str) -> Option<&Table> {
        self.sections.iter().find_map(|s| match s {
            Section::Table { heading: h, table } if h == heading => Some(table),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|s| match s {
            Section::Notice { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

// ── Table columns ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableColumn {
    Field(Column),
    DaysSinceSubmission,
}

impl TableColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Field(c) => c.name(),
            Self::DaysSinceSubmission => "Days_Since_Submission",
        }
    }

    fn present_in(&self, ds: &ClaimDataset) -> bool {
        match self {
            Self::Field(c) => ds.has(*c),
            Self::DaysSinceSubmission => true,
        }
    }
}

const FRAUD_ANALYST_COLUMNS: [TableColumn; 9] = [
    TableColumn::Field(Column::ClaimId),
    TableColumn::Field(Column::PolicyholderName),
    TableColumn::Field(Column::CreditScore),
    TableColumn::Field(Column::MakeName),
    TableColumn::Field(Column::ModelName),
    TableColumn::Field(Column::ClaimAmountRequested),
    TableColumn::Field(Column::FraudProbability),
    TableColumn::Field(Column::SettlementStatus),
    TableColumn::Field(Column::SubmissionDate),
];

const CLAIMS_MANAGER_COLUMNS: [TableColumn; 9] = [
    TableColumn::Field(Column::ClaimId),
    TableColumn::Field(Column::PolicyholderName),
    TableColumn::Field(Column::ClaimAmountRequested),
    TableColumn::Field(Column::SettlementStatus),
    TableColumn::Field(Column::SubmissionDate),
    TableColumn::DaysSinceSubmission,
    TableColumn::Field(Column::CreditScore),
    TableColumn::Field(Column::MakeName),
    TableColumn::Field(Column::ModelName),
];

/// Formats a single claim cell. Probabilities are shown as percentages on
/// the fraud queue only.
fn cell(record: &ClaimRecord, column: TableColumn, pct_probability: bool, today: NaiveDate) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    match column {
        TableColumn::DaysSinceSubmission => metrics::days_since_submission(record, today)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        TableColumn::Field(c) => match c {
            Column::ClaimId => text(&record.claim_id),
            Column::SubmissionDate => record
                .submission_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Column::SettlementStatus => match record.settlement_status.as_deref() {
                Some(s) => format!("{} {s}", StatusTone::of(Some(s)).marker()),
                None => String::new(),
            },
            Column::ClaimAmountRequested => record.claim_amount.map(|a| fmt_fixed(a, 2)).unwrap_or_default(),
            Column::FraudProbability => record
                .fraud_probability
                .map(|p| if pct_probability { fmt_fixed(p * 100.0, 1) } else { p.to_string() })
                .unwrap_or_default(),
            Column::IsFraudulentFlag => record.is_fraudulent.map(|f| (f as u8).to_string()).unwrap_or_default(),
            Column::PolicyholderId => text(&record.policyholder_id),
            Column::PolicyholderName => text(&record.policyholder_name),
            Column::CreditScore => record.credit_score.map(|s| s.to_string()).unwrap_or_default(),
            Column::EmploymentStatus => text(&record.employment_status),
            Column::Vin => text(&record.vin),
            Column::MakeName => text(&record.make_name),
            Column::ModelName => text(&record.model_name),
        },
    }
}

fn claims_table(
    ds: &ClaimDataset,
    rows: &[&ClaimRecord],
    columns: &[TableColumn],
    pct_probability: bool,
    today: NaiveDate,
) -> Table {
    let shown: Vec<TableColumn> = columns.iter().copied().filter(|c| c.present_in(ds)).collect();
    Table {
        columns: shown.iter().map(|c| c.name().to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| shown.iter().map(|c| cell(r, *c, pct_probability, today)).collect())
            .collect(),
    }
}

fn metric_text<T>(metric: &Metric<T>, fmt: impl Fn(&T) -> String) -> String {
    match metric {
        Metric::Value(v) => fmt(v),
        Metric::Unavailable(_) => "N/A".to_string(),
    }
}

fn missing_column_notice(column: Column, what: &str) -> Section {
    Section::Notice {
        heading: None,
        message: format!("{} column not found in view – cannot build {what}.", column.name()),
    }
}

fn notes(heading: &str, items: &[&str]) -> Section {
    Section::Notes { heading: heading.to_string(), items: items.iter().map(|s| s.to_string()).collect() }
}

// ── Builders ─────────────────────────────────────────────────────────────────

pub fn build_report(screen: Screen, ds: &ClaimDataset, params: &ReportParams) -> ScreenReport {
    let (title, subtitle) = match screen {
        Screen::FraudAnalyst => (
            "Fraud Analyst Dashboard",
            "Prioritized claims queue driven by predictive fraud probabilities from the database.",
        ),
        Screen::ExecutiveKpis => (
            "Executive Management Dashboard",
            "Strategic KPIs for profitability, fraud control, and portfolio quality.",
        ),
        Screen::ClaimsManager => (
            "Claims Manager Dashboard",
            "Operational view for validation queue and aging of open claims.",
        ),
    };

    let sections = if ds.is_empty() {
        vec![Section::Notice { heading: None, message: format!("No data returned from {}.", params.view_name) }]
    } else {
        match screen {
            Screen::FraudAnalyst => fraud_analyst_sections(ds, params),
            Screen::ExecutiveKpis => executive_sections(ds),
            Screen::ClaimsManager => claims_manager_sections(ds, params.today),
        }
    };

    ScreenReport { screen, title: title.to_string(), subtitle: subtitle.to_string(), sections }
}

fn fraud_analyst_sections(ds: &ClaimDataset, params: &ReportParams) -> Vec<Section> {
    let priority = metrics::high_priority_claims(ds, params.threshold, params.credit_filter);
    let totals: ClaimTotals = metrics::claim_totals(ds);
    log::debug!(
        "fraud_analyst: threshold={} credit={:?} high_priority={:?}",
        params.threshold,
        params.credit_filter,
        priority.value().map(Vec::len),
    );

    let tiles = vec![
        KpiTile::new(
            "High-Priority Claims",
            metric_text(&priority, |rows| rows.len().to_string()),
            format!("Fraud probability ≥ {}", params.threshold),
        ),
        KpiTile::new(
            "Average Fraud Probability",
            metric_text(&totals.mean_fraud_probability, |m| fmt_pct(m * 100.0, 1)),
            "Across all claims in the system",
        ),
        KpiTile::new(
            "Confirmed Fraud (YTD)",
            metric_text(&totals.confirmed_fraud, |n| n.to_string()),
            format!("{} = 1", Column::IsFraudulentFlag.name()),
        ),
        KpiTile::new(
            "Total Claims in View",
            totals.total_claims.to_string(),
            format!("Rows in {}", params.view_name),
        ),
    ];

    let mut sections = vec![Section::Kpis { tiles }];
    match priority {
        Metric::Value(rows) => sections.push(Section::Table {
            heading: "High-priority claims table".into(),
            table: claims_table(ds, &rows, &FRAUD_ANALYST_COLUMNS, true, params.today),
        }),
        Metric::Unavailable(Unavailable::MissingColumn(c)) => {
            sections.push(missing_column_notice(c, "high-priority queue"))
        }
        Metric::Unavailable(Unavailable::NoData) => {}
    }
    sections.push(notes(
        "How to read this table",
        &[
            "High-priority = claims with high model fraud probability",
            "You can adjust the fraud threshold and credit score filters",
            "Use this queue as starting point for manual investigations",
        ],
    ));
    sections
}

fn executive_sections(ds: &ClaimDataset) -> Vec<Section> {
    let totals = metrics::claim_totals(ds);

    let tiles = vec![
        KpiTile::new(
            "Total Claims (YTD)",
            totals.total_claims.to_string(),
            "All claims in current analytics view",
        ),
        KpiTile::new(
            "Total Claim Value",
            metric_text(&totals.total_claim_amount, |v| fmt_money(*v)),
            format!("Sum of {}", Column::ClaimAmountRequested.name()),
        ),
        KpiTile::new(
            "Confirmed Fraud Rate",
            metric_text(&totals.confirmed_fraud_rate_pct, |v| fmt_pct(*v, 1)),
            format!("{} = 1 / Total claims", Column::IsFraudulentFlag.name()),
        ),
        KpiTile::new(
            "Average Claim Amount",
            metric_text(&totals.mean_claim_amount, |v| fmt_money(*v)),
            format!("Mean {}", Column::ClaimAmountRequested.name()),
        ),
    ];
    let mut sections = vec![Section::Kpis { tiles }];

    match metrics::status_mix(ds) {
        Metric::Value(mix) => sections.push(Section::Table {
            heading: "Claim status mix".into(),
            table: Table {
                columns: vec![Column::SettlementStatus.name().to_string(), "Count".to_string()],
                rows: mix
                    .into_iter()
                    .map(|s| vec![s.status.unwrap_or_else(|| "(unknown)".to_string()), s.count.to_string()])
                    .collect(),
            },
        }),
        Metric::Unavailable(_) => sections.push(missing_column_notice(Column::SettlementStatus, "mix table")),
    }

    match metrics::top_risk_customers(ds) {
        Metric::Value(ranked) => sections.push(Section::Table {
            heading: "Top high-risk customers (frequency & value)".into(),
            table: Table {
                columns: ["Policyholder_Name", "Claims", "Total_Claim_Value", "Avg_Fraud_Prob"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rows: ranked
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.policyholder_name,
                            c.claims.to_string(),
                            fmt_fixed(c.total_claim_value, 2),
                            c.avg_fraud_probability.map(|p| fmt_fixed(p * 100.0, 1)).unwrap_or_default(),
                        ]
                    })
                    .collect(),
            },
        }),
        Metric::Unavailable(_) => sections.push(missing_column_notice(Column::PolicyholderName, "customer ranking")),
    }

    sections.push(notes(
        "Executive interpretation tips",
        &[
            "Fraud rate gives you a quick sense of effectiveness of controls",
            "The status mix shows operational backlog and closure efficiency",
            "Top high-risk customers combine high frequency + high value + higher fraud probability",
        ],
    ));
    sections
}

fn claims_manager_sections(ds: &ClaimDataset, today: NaiveDate) -> Vec<Section> {
    let queue = metrics::validation_queue(ds);
    let summary = metrics::queue_summary(&queue, today);
    log::debug!("claims_manager: {summary:?}");

    let tiles = vec![
        KpiTile::new(
            "Claims Pending Validation",
            summary.pending_validation.to_string(),
            "High value or sensitive status (Open / Investigation / Denied)",
        ),
        KpiTile::new(
            "Open / In Investigation",
            (summary.open + summary.in_investigation).to_string(),
            format!("{} Open · {} In Investigation", summary.open, summary.in_investigation),
        ),
        KpiTile::new(
            "Avg. Age of Validation Queue",
            summary.avg_age_days.map(|d| format!("{} days", fmt_fixed(d, 0))).unwrap_or_else(|| "N/A".into()),
            "Days since submission for claims in queue",
        ),
    ];

    vec![
        Section::Kpis { tiles },
        Section::Table {
            heading: "Claims requiring manager validation".into(),
            table: claims_table(ds, &queue, &CLAIMS_MANAGER_COLUMNS, false, today),
        },
        notes(
            "Suggested manager actions",
            &[
                "Validate high-value claims (≥ 20,000) regardless of status",
                "Review Denied claims with high amount or high fraud score",
                "Monitor aging of Open / In Investigation to avoid backlog",
            ],
        ),
    ]
}
