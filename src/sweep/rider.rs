//! Rider cash-flow sweep
//!
//! Riders are swept record by record under both risk classes. A planning
//! pass first walks every rider once to discover its projection term and
//! waiver classification, which fixes the result arena's size before the
//! expensive sweep begins. Waiver-of-premium riders are evaluated after all
//! other riders; within each group the risk classes run Standard first, then
//! Sub-standard. A single row cursor advances monotonically across the whole
//! run; rider terms vary, so offsets cannot be computed per scenario the
//! way the base sweep's can.

use crate::engine::{names, CalcEngine, ClearScope};
use crate::error::SweepError;
use crate::tables::{copy_summary_window, ensure_capacity, valid_prefix_len};
use log::{debug, info};
use serde::Serialize;

/// Risk classes the rider formulas understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiderClass {
    Standard,
    SubStandard,
}

impl RiderClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiderClass::Standard => "Standard",
            RiderClass::SubStandard => "Sub-standard",
        }
    }
}

pub const RIDER_CLASSES: [RiderClass; 2] = [RiderClass::Standard, RiderClass::SubStandard];

/// Outcome of the planning pass over the rider input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderPlan {
    /// Result rows the sweep will produce: two risk classes per rider, each
    /// contributing that rider's projection term
    pub total_rows: usize,
    /// Record indices of ordinary riders, in input order
    pub non_waiver: Vec<usize>,
    /// Record indices of waiver-of-premium riders, in input order
    pub waiver: Vec<usize>,
}

/// Dry-run pass: classify every rider and total the projection terms
///
/// Each record is written to the scratch rider row and only its dependent
/// input cells are recalculated, enough to read back the waiver flag and
/// the term without running the full cash-flow tables.
pub fn plan_rider_rows(engine: &mut dyn CalcEngine) -> Result<RiderPlan, SweepError> {
    let count = engine.table_row_count(names::TBL_RIDER)?;
    let rows = engine.read_table_rows(names::TBL_RIDER, 0..count)?;
    let prefix = valid_prefix_len(&rows);

    let mut non_waiver = Vec::new();
    let mut waiver = Vec::new();
    let mut term_total = 0;

    for (index, row) in rows[..prefix].iter().enumerate() {
        engine.write_row(names::RIDER_SCRATCH, row)?;
        engine.recalculate(names::RIDER_INPUT_BLOCK)?;

        let is_waiver = engine
            .read_scalar(names::RIDER_IS_WAIVER)?
            .as_bool()
            .ok_or_else(|| SweepError::bad_cell(names::RIDER_IS_WAIVER, "boolean flag"))?;
        let term = engine
            .read_scalar(names::RIDER_TERM)?
            .as_usize()
            .ok_or_else(|| SweepError::bad_cell(names::RIDER_TERM, "whole number"))?;

        if is_waiver {
            waiver.push(index);
        } else {
            non_waiver.push(index);
        }
        term_total += term;
    }

    Ok(RiderPlan {
        total_rows: term_total * 2,
        non_waiver,
        waiver,
    })
}

/// Run the rider cash-flow sweep; returns the number of result rows produced
pub fn run_rider_sweep(engine: &mut dyn CalcEngine) -> Result<usize, SweepError> {
    let plan = plan_rider_rows(engine)?;
    info!(
        "rider sweep: {} ordinary, {} waiver, {} result rows",
        plan.non_waiver.len(),
        plan.waiver.len(),
        plan.total_rows
    );

    ensure_capacity(engine, names::TBL_RIDER_CF_RESULT, plan.total_rows)?;

    let mut cursor = 0;
    cursor = run_pass(engine, &plan.non_waiver, cursor)?;
    cursor = run_pass(engine, &plan.waiver, cursor)?;

    // Leave the document neutral
    engine.clear_region(names::RIDER_SCRATCH, ClearScope::Contents)?;
    engine.clear_region(names::RIDER_RISK, ClearScope::Contents)?;

    info!("rider sweep: {} result rows", cursor);
    Ok(cursor)
}

/// Sweep one group of rider records under both risk classes
///
/// The cursor arrives from the previous pass and leaves pointing at the next
/// free result row; it is never reset.
fn run_pass(
    engine: &mut dyn CalcEngine,
    indices: &[usize],
    start: usize,
) -> Result<usize, SweepError> {
    let count = engine.table_row_count(names::TBL_RIDER)?;
    let data = engine.read_table_rows(names::TBL_RIDER, 0..count)?;

    let mut cursor = start;
    for class in RIDER_CLASSES {
        engine.write_scalar(names::RIDER_RISK, class.as_str().into())?;

        for &index in indices {
            engine.write_row(names::RIDER_SCRATCH, &data[index])?;

            // The modal-factor cells live outside the managed tables and
            // hold the previous rider's factors until forced to recalculate
            engine.recalculate(names::RIDER_FACTOR_BLOCK)?;
            engine.recalculate(names::TBL_RIDER_CF)?;
            engine.recalculate(names::TBL_RIDER_CF_SUMMARY)?;

            let term = engine
                .read_scalar(names::RIDER_TERM)?
                .as_usize()
                .ok_or_else(|| SweepError::bad_cell(names::RIDER_TERM, "whole number"))?;

            debug!(
                "rider {} ({}) -> rows [{}, {})",
                index,
                class.as_str(),
                cursor,
                cursor + term
            );

            copy_summary_window(
                engine,
                names::TBL_RIDER_CF_SUMMARY,
                names::TBL_RIDER_CF_RESULT,
                term,
                cursor,
            )?;
            cursor += term;
        }
    }

    Ok(cursor)
}
