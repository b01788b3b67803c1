//! Full-run sequencing
//!
//! A run is strictly sequential: validation gate, base sweep, rider sweep.
//! The document runs in manual recalculation mode for the duration so every
//! recalculation is an explicit round trip the sweeps control; automatic
//! mode comes back on the success path only, matching the rest of the
//! cleanup policy (a failed run leaves the document exactly as the failure
//! found it).

use crate::engine::{names, CalcEngine, RecalcMode};
use crate::error::SweepError;
use crate::sweep::{run_base_sweep, run_rider_sweep};
use log::info;
use serde::Serialize;

/// Row counts produced by a completed run
///
/// The core does no reporting of its own; the caller renders this however
/// its host surface requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub base_rows: usize,
    pub rider_rows: usize,
}

/// Run the complete sweep against the given engine handle
pub fn run_full_sweep(engine: &mut dyn CalcEngine) -> Result<RunReport, SweepError> {
    engine.set_recalc_mode(RecalcMode::Manual)?;

    let validated = engine
        .read_scalar(names::INPUT_VALIDATION)?
        .as_bool()
        .unwrap_or(false);
    if !validated {
        return Err(SweepError::ValidationFailed);
    }

    info!("sweep run started");
    let base_rows = run_base_sweep(engine)?;
    let rider_rows = run_rider_sweep(engine)?;

    engine.set_recalc_mode(RecalcMode::Automatic)?;
    info!("sweep run finished: {} base rows, {} rider rows", base_rows, rider_rows);

    Ok(RunReport {
        base_rows,
        rider_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellValue, MemoryWorkbook};

    #[test]
    fn test_validation_gate_blocks_run() {
        let mut wb = MemoryWorkbook::new();
        wb.define_scalar(names::INPUT_VALIDATION, CellValue::Bool(false));
        // Result tables would be required past the gate; their absence
        // proves the gate short-circuits
        let err = run_full_sweep(&mut wb).unwrap_err();
        assert!(matches!(err, SweepError::ValidationFailed));

        // The failure path restores nothing
        assert_eq!(wb.recalc_mode(), RecalcMode::Manual);
    }

    #[test]
    fn test_missing_gate_value_blocks_run() {
        let mut wb = MemoryWorkbook::new();
        wb.define_scalar(names::INPUT_VALIDATION, CellValue::Empty);

        let err = run_full_sweep(&mut wb).unwrap_err();
        assert!(matches!(err, SweepError::ValidationFailed));
    }
}
