//! Base cash-flow sweep
//!
//! One pass over the product's scenario combinations: write the three axis
//! values into the scratch scenario slots, recalculate the dependent input
//! block and the calculation and summary tables, then copy the summary
//! window into the result arena at the scenario's fixed offset. Result rows
//! for scenario i occupy `[i * term, (i + 1) * term)`.

use crate::engine::{names, CalcEngine, CellValue};
use crate::error::SweepError;
use crate::scenario::combinations;
use crate::schedule::normalize_withdrawals;
use crate::tables::{copy_summary_window, ensure_capacity};
use log::{debug, info};

/// Run the base cash-flow sweep; returns the number of result rows produced
///
/// An unrecognized product enumerates zero combinations: the result arena is
/// still cleared and the scratch slots still blanked, so a stale prior run
/// cannot masquerade as output.
pub fn run_base_sweep(engine: &mut dyn CalcEngine) -> Result<usize, SweepError> {
    let term = engine
        .read_scalar(names::BASE_TERM)?
        .as_usize()
        .ok_or_else(|| SweepError::bad_cell(names::BASE_TERM, "whole number"))?;
    let product = engine
        .read_scalar(names::PRODUCT)?
        .as_text()
        .unwrap_or_default()
        .to_string();

    info!("base sweep: product {:?}, term {}", product, term);

    normalize_withdrawals(engine)?;

    let scenarios = combinations(&product);
    ensure_capacity(engine, names::TBL_BASE_CF_RESULT, scenarios.len() * term)?;

    let mut cursor = 0;
    for scenario in &scenarios {
        debug!(
            "scenario {}/{}/{} -> rows [{}, {})",
            scenario.int_rate,
            scenario.prem_term,
            scenario.risk_type.as_str(),
            cursor,
            cursor + term
        );

        engine.write_scalar(names::INT_RATE_SCENARIO, scenario.int_rate.into())?;
        engine.write_scalar(names::RISK_SCENARIO, scenario.risk_type.as_str().into())?;
        engine.write_scalar(names::PREM_TERM_SCENARIO, scenario.prem_term.into())?;

        engine.recalculate(names::BASE_SCENARIO_BLOCK)?;
        engine.recalculate(names::TBL_BASE_CF)?;
        engine.recalculate(names::TBL_BASE_CF_SUMMARY)?;

        copy_summary_window(
            engine,
            names::TBL_BASE_CF_SUMMARY,
            names::TBL_BASE_CF_RESULT,
            term,
            cursor,
        )?;
        cursor += term;
    }

    // Leave the document neutral: blank the scenario slots even when no
    // combination ran
    for slot in [
        names::INT_RATE_SCENARIO,
        names::RISK_SCENARIO,
        names::PREM_TERM_SCENARIO,
    ] {
        engine.write_scalar(slot, CellValue::Empty)?;
    }

    info!("base sweep: {} result rows", cursor);
    Ok(cursor)
}
