use crate::{demo_data::DemoPortfolio, error::DashResult};
use rusqlite::{params, Connection};

/// Create a claims database at `path` holding `portfolio`, plus the
/// `V_FRAUD_ANALYTICS_DASHBOARD` view over it. An existing database is
/// reseeded: its four portfolio tables are emptied in the same transaction
/// that inserts the new rows.
pub fn write_demo_database(path: &str, portfolio: &DemoPortfolio) -> DashResult<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    conn.execute_batch(include_str!("../../../migrations/001_claims_portfolio.sql"))?;

    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM fraud_score;
         DELETE FROM claim;
         DELETE FROM vehicle;
         DELETE FROM policyholder;",
    )?;
    {
        let mut insert_holder = tx.prepare(
            "INSERT INTO policyholder (policyholder_id, full_name, credit_score, employment_status)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for p in &portfolio.policyholders {
            insert_holder.execute(params![p.policyholder_id, p.full_name, p.credit_score, p.employment_status])?;
        }

        let mut insert_vehicle = tx.prepare(
            "INSERT INTO vehicle (vin, policyholder_id, make_name, model_name) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for v in &portfolio.vehicles {
            insert_vehicle.execute(params![v.vin, v.policyholder_id, v.make_name, v.model_name])?;
        }

        let mut insert_claim = tx.prepare(
            "INSERT INTO claim (
                claim_id, policyholder_id, vin, submission_date, settlement_status,
                claim_amount_requested, is_fraudulent_flag
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut insert_score =
            tx.prepare("INSERT INTO fraud_score (claim_id, fraud_probability) VALUES (?1, ?2)")?;
        for c in &portfolio.claims {
            insert_claim.execute(params![
                c.claim_id,
                c.policyholder_id,
                c.vin,
                c.submission_date.map(|d| d.format("%Y-%m-%d").to_string()),
                c.settlement_status,
                c.claim_amount_requested,
                if c.is_fraudulent { 1i32 } else { 0i32 },
            ])?;
            insert_score.execute(params![c.claim_id, c.fraud_probability])?;
        }
    }
    tx.commit()?;

    log::info!(
        "seed: wrote {} policyholders, {} vehicles, {} claims to {path}",
        portfolio.policyholders.len(),
        portfolio.vehicles.len(),
        portfolio.claims.len()
    );
    Ok(())
}
