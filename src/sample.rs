//! Sample in-memory workbook
//!
//! Wires a `MemoryWorkbook` with simplified fund-projection formulas so the
//! sweep can run end to end without the production document: an annual fund
//! roll-forward for the base product, parameterized by the scenario slots,
//! and a premium/claims/reserve projection per rider, parameterized by risk
//! class. The arithmetic is coarse; the point is a host whose outputs
//! respond to every scratch input the sweep writes.

use crate::deck::RiderRecord;
use crate::engine::{names, CellValue, EngineError, MemoryWorkbook, SheetState};
use crate::schedule::WithdrawalRecord;
use std::collections::HashMap;

// Formula-internal cells of the sample document
const CREDITED_RATE: &str = "credited_rate";
const RISK_LOADING: &str = "risk_loading";
const PREMIUM_YEARS: &str = "premium_years";
const ANNUAL_PREMIUM: &str = "annual_premium";
const OPTED_PREM_YEARS: &str = "opted_prem_years";
const MODAL_FACTOR: &str = "rider_modal_factor";

/// Columns of the base cash-flow tables
pub const BASE_COLUMNS: usize = 6; // year, premium, withdrawal, charges, interest, fund_eop
/// Columns of the rider cash-flow tables
pub const RIDER_COLUMNS: usize = 4; // year, rider_premium, expected_claims, reserve

/// Default withdrawal instructions, in policy years
pub fn default_withdrawals() -> Vec<WithdrawalRecord> {
    vec![
        WithdrawalRecord { start_year: 2, end_year: 4, amount: 500.0 },
        WithdrawalRecord { start_year: 7, end_year: 7, amount: 1_500.0 },
    ]
}

/// Default rider deck: accidental death, critical illness, premium waiver
pub fn default_riders() -> Vec<RiderRecord> {
    vec![
        RiderRecord {
            code: "ADB01".to_string(),
            sum_assured: 50_000.0,
            term_years: 10,
            rate_per_mille: 1.2,
        },
        RiderRecord {
            code: "CI01".to_string(),
            sum_assured: 30_000.0,
            term_years: 15,
            rate_per_mille: 4.5,
        },
        RiderRecord {
            code: "WOP01".to_string(),
            sum_assured: 12_000.0,
            term_years: 20,
            rate_per_mille: 2.0,
        },
    ]
}

/// Build the sample document for one product
pub fn build_workbook(
    product: &str,
    term: usize,
    withdrawals: &[WithdrawalRecord],
    riders: &[RiderRecord],
) -> MemoryWorkbook {
    let mut wb = MemoryWorkbook::new();

    // Run-level inputs
    wb.define_scalar(names::INPUT_VALIDATION, CellValue::Bool(true));
    wb.define_scalar(names::PRODUCT, product.into());
    wb.define_scalar(names::BASE_TERM, (term as f64).into());

    // Base scenario scratch and derived cells
    wb.define_region(names::INT_RATE_SCENARIO, 1);
    wb.define_region(names::RISK_SCENARIO, 1);
    wb.define_region(names::PREM_TERM_SCENARIO, 1);
    wb.define_region(names::BASE_SCENARIO_BLOCK, 1);
    wb.define_region(CREDITED_RATE, 1);
    wb.define_region(RISK_LOADING, 1);
    wb.define_region(PREMIUM_YEARS, 1);
    wb.define_scalar(ANNUAL_PREMIUM, CellValue::Number(1_200.0));
    wb.define_scalar(OPTED_PREM_YEARS, CellValue::Number(5.0));

    // Withdrawal tables: sparse input rows plus the customary trailing blank
    let mut input_rows: Vec<Vec<CellValue>> = withdrawals
        .iter()
        .map(|w| vec![w.start_year.into(), w.end_year.into(), w.amount.into()])
        .collect();
    input_rows.push(vec![CellValue::Empty; 3]);
    wb.define_table_with_rows(names::TBL_WITHDRAWAL, 3, input_rows);
    wb.define_table(names::TBL_WITHDRAWAL_SCHEDULE, 2);

    // Base cash-flow tables
    wb.define_table(names::TBL_BASE_CF, BASE_COLUMNS);
    wb.define_table(names::TBL_BASE_CF_SUMMARY, BASE_COLUMNS);
    wb.define_table(names::TBL_BASE_CF_RESULT, BASE_COLUMNS);

    // Rider input table, scratch row, derived cells
    let mut rider_rows: Vec<Vec<CellValue>> = riders.iter().map(RiderRecord::to_row).collect();
    rider_rows.push(vec![CellValue::Empty; 4]);
    wb.define_table_with_rows(names::TBL_RIDER, 4, rider_rows);
    wb.define_region(names::RIDER_SCRATCH, 4);
    wb.define_region(names::RIDER_RISK, 1);
    wb.define_region(names::RIDER_IS_WAIVER, 1);
    wb.define_region(names::RIDER_TERM, 1);
    wb.define_region(names::RIDER_INPUT_BLOCK, 1);
    wb.define_region(names::RIDER_FACTOR_BLOCK, 1);
    wb.define_region(MODAL_FACTOR, 1);

    // Rider cash-flow tables
    wb.define_table(names::TBL_RIDER_CF, RIDER_COLUMNS);
    wb.define_table(names::TBL_RIDER_CF_SUMMARY, RIDER_COLUMNS);
    wb.define_table(names::TBL_RIDER_CF_RESULT, RIDER_COLUMNS);

    // Formula hooks
    wb.on_recalc(names::BASE_SCENARIO_BLOCK, derive_base_scenario);
    wb.on_recalc(names::TBL_BASE_CF, project_base_cf);
    wb.on_recalc(names::TBL_BASE_CF_SUMMARY, |state| {
        mirror_table(state, names::TBL_BASE_CF, names::TBL_BASE_CF_SUMMARY)
    });
    wb.on_recalc(names::RIDER_INPUT_BLOCK, derive_rider_inputs);
    wb.on_recalc(names::RIDER_FACTOR_BLOCK, |state| {
        derive_rider_inputs(state)?;
        derive_modal_factor(state)
    });
    wb.on_recalc(names::TBL_RIDER_CF, project_rider_cf);
    wb.on_recalc(names::TBL_RIDER_CF_SUMMARY, |state| {
        mirror_table(state, names::TBL_RIDER_CF, names::TBL_RIDER_CF_SUMMARY)
    });

    wb
}

/// Scenario slots -> credited rate, risk loading, paying years
fn derive_base_scenario(state: &mut SheetState) -> Result<(), EngineError> {
    let rate = match state.scalar(names::INT_RATE_SCENARIO)?.as_text() {
        Some("High") => 0.06,
        Some("Low") => 0.02,
        Some("Guaranteed") => 0.005,
        _ => 0.0,
    };
    let loading = match state.scalar(names::RISK_SCENARIO)?.as_text() {
        Some("Subrisk") => 1.25,
        _ => 1.0,
    };
    let term = state.scalar(names::BASE_TERM)?.as_f64().unwrap_or(0.0);
    let opted = state.scalar(OPTED_PREM_YEARS)?.as_f64().unwrap_or(0.0);
    let paying_years = match state.scalar(names::PREM_TERM_SCENARIO)?.as_text() {
        Some("Must-pay term") => 3.0,
        Some("Policy term") => term,
        Some("Opted term") => opted,
        _ => 0.0,
    };

    state.set_scalar(CREDITED_RATE, rate.into())?;
    state.set_scalar(RISK_LOADING, loading.into())?;
    state.set_scalar(PREMIUM_YEARS, paying_years.into())
}

/// Annual fund roll-forward for the base product
fn project_base_cf(state: &mut SheetState) -> Result<(), EngineError> {
    let term = state.scalar(names::BASE_TERM)?.as_usize().unwrap_or(0);
    let rate = state.scalar(CREDITED_RATE)?.as_f64().unwrap_or(0.0);
    let loading = state.scalar(RISK_LOADING)?.as_f64().unwrap_or(1.0);
    let paying_years = state.scalar(PREMIUM_YEARS)?.as_f64().unwrap_or(0.0);
    let annual_premium = state.scalar(ANNUAL_PREMIUM)?.as_f64().unwrap_or(0.0);

    // Dense schedule rows are keyed by policy year in the sample deck
    let schedule: HashMap<u32, f64> = state
        .table(names::TBL_WITHDRAWAL_SCHEDULE)?
        .rows()
        .iter()
        .filter_map(|row| Some((row.first()?.as_u32()?, row.get(1)?.as_f64()?)))
        .collect();

    let mut fund = 0.0_f64;
    let mut rows = Vec::with_capacity(term);
    for year in 1..=term as u32 {
        let premium = if f64::from(year) <= paying_years {
            annual_premium
        } else {
            0.0
        };
        let withdrawal = schedule.get(&year).copied().unwrap_or(0.0);
        let charges = (fund + premium) * 0.015 * loading;
        let interest = (fund + premium - charges) * rate;
        fund = (fund + premium - charges + interest - withdrawal).max(0.0);

        rows.push(vec![
            CellValue::Number(f64::from(year)),
            premium.into(),
            withdrawal.into(),
            charges.into(),
            interest.into(),
            fund.into(),
        ]);
    }

    state.set_table_rows(names::TBL_BASE_CF, rows)
}

/// Scratch rider row -> waiver flag and projection term
fn derive_rider_inputs(state: &mut SheetState) -> Result<(), EngineError> {
    let scratch = state.region(names::RIDER_SCRATCH)?;
    let code = scratch[0].to_string();
    let term = scratch[2].clone();

    state.set_scalar(names::RIDER_IS_WAIVER, code.starts_with("WOP").into())?;
    state.set_scalar(names::RIDER_TERM, term)
}

/// Risk class -> modal factor; sits outside the managed tables
fn derive_modal_factor(state: &mut SheetState) -> Result<(), EngineError> {
    let factor = match state.scalar(names::RIDER_RISK)?.as_text() {
        Some("Sub-standard") => 1.5,
        _ => 1.0,
    };
    state.set_scalar(MODAL_FACTOR, factor.into())
}

/// Premium/claims/reserve projection for the current scratch rider
fn project_rider_cf(state: &mut SheetState) -> Result<(), EngineError> {
    let scratch = state.region(names::RIDER_SCRATCH)?;
    let sum_assured = scratch[1].as_f64().unwrap_or(0.0);
    let rate_per_mille = scratch[3].as_f64().unwrap_or(0.0);
    let term = state.scalar(names::RIDER_TERM)?.as_usize().unwrap_or(0);
    let factor = state.scalar(MODAL_FACTOR)?.as_f64().unwrap_or(1.0);

    let annual_premium = sum_assured / 1_000.0 * rate_per_mille * factor;
    let mut reserve = 0.0_f64;
    let mut rows = Vec::with_capacity(term);
    for year in 1..=term as u32 {
        let claims = annual_premium * 0.55;
        reserve += annual_premium - claims;

        rows.push(vec![
            CellValue::Number(f64::from(year)),
            annual_premium.into(),
            claims.into(),
            reserve.into(),
        ]);
    }

    state.set_table_rows(names::TBL_RIDER_CF, rows)
}

/// Summary tables mirror their calculation tables row for row
fn mirror_table(state: &mut SheetState, src: &str, dst: &str) -> Result<(), EngineError> {
    let rows = state.table(src)?.rows().to_vec();
    state.set_table_rows(dst, rows)
}
