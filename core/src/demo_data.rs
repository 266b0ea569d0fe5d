//! Synthetic claims portfolio for local runs and tests.
//!
//! Generation is fully deterministic in `(seed, claim_count, as_of)`.
//! Roughly one policyholder per three claims, with a skew so a few
//! policyholders file many claims (the executive ranking needs repeaters).

use crate::{
    name_generator::NameGenerator,
    rng::{SeededRng, Stream},
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const STATUSES: [(&str, f64); 5] = [
    ("Open", 0.25),
    ("In Investigation", 0.15),
    ("Settled", 0.42),
    ("Denied", 0.12),
    ("Withdrawn", 0.06),
];
const EMPLOYMENT: [&str; 4] = ["Employed", "Self-Employed", "Unemployed", "Retired"];
const UNKNOWN_DATE_RATE: f64 = 0.02;
const MAX_CLAIM_AMOUNT: f64 = 150_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoPolicyholder {
    pub policyholder_id: i64,
    pub full_name: String,
    pub credit_score: i64,
    pub employment_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoVehicle {
    pub vin: String,
    pub policyholder_id: i64,
    pub make_name: String,
    pub model_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoClaim {
    pub claim_id: i64,
    pub policyholder_id: i64,
    pub vin: String,
    pub submission_date: Option<NaiveDate>,
    pub settlement_status: String,
    pub claim_amount_requested: f64,
    pub fraud_probability: f64,
    pub is_fraudulent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemoPortfolio {
    pub policyholders: Vec<DemoPolicyholder>,
    pub vehicles: Vec<DemoVehicle>,
    pub claims: Vec<DemoClaim>,
}

pub fn generate(seed: u64, claim_count: usize, as_of: NaiveDate) -> DemoPortfolio {
    if claim_count == 0 {
        return DemoPortfolio::default();
    }
    let holder_count = (claim_count / 3).max(1);

    let mut people = SeededRng::new(seed, Stream::Policyholders);
    let policyholders: Vec<DemoPolicyholder> = (0..holder_count)
        .map(|i| DemoPolicyholder {
            policyholder_id: 1000 + i as i64,
            full_name: NameGenerator::full_name(&mut people),
            credit_score: 450 + people.below(400) as i64,
            employment_status: people.pick(&EMPLOYMENT).to_string(),
        })
        .collect();

    let mut cars = SeededRng::new(seed, Stream::Vehicles);
    let vehicles: Vec<DemoVehicle> = policyholders
        .iter()
        .map(|p| {
            let (make, model) = NameGenerator::vehicle(&mut cars);
            DemoVehicle {
                vin: NameGenerator::vin(&mut cars),
                policyholder_id: p.policyholder_id,
                make_name: make.to_string(),
                model_name: model.to_string(),
            }
        })
        .collect();

    let mut claims_rng = SeededRng::new(seed, Stream::Claims);
    let mut scores = SeededRng::new(seed, Stream::Scores);
    let status_weights: Vec<f64> = STATUSES.iter().map(|(_, w)| *w).collect();

    let claims = (0..claim_count)
        .map(|i| {
            // Squaring the roll concentrates claims on low indices.
            let roll = claims_rng.next_f64();
            let holder_idx = ((roll * roll) * holder_count as f64) as usize;
            let holder = &policyholders[holder_idx.min(holder_count - 1)];
            let vehicle = &vehicles[holder_idx.min(holder_count - 1)];

            let submission_date = if claims_rng.chance(UNKNOWN_DATE_RATE) {
                None
            } else {
                Some(as_of - Duration::days(claims_rng.below(365) as i64))
            };
            let settlement_status = STATUSES[claims_rng.weighted_index(&status_weights)].0.to_string();
            let amount = claims_rng.pareto(1_500.0, 1.4).min(MAX_CLAIM_AMOUNT);
            let claim_amount_requested = (amount * 100.0).round() / 100.0;

            // Lower credit scores and large amounts lean toward higher scores.
            let credit_factor = (850 - holder.credit_score) as f64 / 400.0;
            let amount_factor = (claim_amount_requested / 50_000.0).min(1.0);
            let raw = 0.55 * scores.next_f64() + 0.25 * credit_factor + 0.20 * amount_factor;
            let fraud_probability = (raw.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0;
            let is_fraudulent = settlement_status != "Open" && scores.chance(fraud_probability * 0.4);

            DemoClaim {
                claim_id: 1 + i as i64,
                policyholder_id: holder.policyholder_id,
                vin: vehicle.vin.clone(),
                submission_date,
                settlement_status,
                claim_amount_requested,
                fraud_probability,
                is_fraudulent,
            }
        })
        .collect();

    DemoPortfolio { policyholders, vehicles, claims }
}
