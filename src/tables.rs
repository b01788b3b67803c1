//! Result-table capacity management and the summary-to-result copy
//!
//! Result tables are flat row arenas addressed by absolute offset. Capacity
//! is established once, up front, for the whole sweep, never grown
//! incrementally per scenario. Rows are only ever content-cleared, never
//! structurally removed, so a live external document is not reflowed
//! mid-run.

use crate::engine::{CalcEngine, CellValue, ClearScope};
use crate::error::SweepError;

/// Length of the leading run of rows whose first cell is non-empty
///
/// Input tables terminate at the first row with an empty leading cell; rows
/// past that sentinel are never examined, even if populated.
pub fn valid_prefix_len(rows: &[Vec<CellValue>]) -> usize {
    rows.iter()
        .position(|row| row.first().map_or(true, |cell| cell.is_empty()))
        .unwrap_or(rows.len())
}

/// Ensure a result table holds exactly `required` cleared rows
///
/// Clears every existing content row first so no stale rows survive a prior
/// run with more scenarios, then grows the table if its current capacity
/// falls short. Idempotent in shape: repeated calls with the same target
/// leave exactly `required` empty rows.
pub fn ensure_capacity(
    engine: &mut dyn CalcEngine,
    table: &str,
    required: usize,
) -> Result<(), SweepError> {
    engine.clear_table(table, ClearScope::All)?;

    let current = engine.table_row_count(table)?;
    if current >= required {
        return Ok(());
    }

    engine.append_blank_rows(table, required - current)?;
    Ok(())
}

/// Copy one scenario's summary window into the result arena at row `idx`
///
/// The summary table's natural row count S may exceed the projection term T
/// when the engine projects past the term; the copied window is the *last* T
/// rows, discarding the leading overrun. S == T degenerates to copying the
/// whole summary. S < T leaves no full window to copy and fails the run.
///
/// Source and destination are assumed to share column layout. A mismatch is
/// not pre-validated; it surfaces as the engine's write failure.
pub fn copy_summary_window(
    engine: &mut dyn CalcEngine,
    summary: &str,
    result: &str,
    term: usize,
    idx: usize,
) -> Result<(), SweepError> {
    let have = engine.table_row_count(summary)?;
    if have < term {
        return Err(SweepError::SummaryTooShort { have, need: term });
    }

    let window = engine.read_table_rows(summary, (have - term)..have)?;
    engine.write_table_rows(result, idx, &window)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryWorkbook;

    fn row(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Number(v)).collect()
    }

    #[test]
    fn test_valid_prefix_stops_at_first_empty_lead() {
        let rows = vec![
            row(&[1.0, 2.0]),
            row(&[3.0, 4.0]),
            vec![CellValue::Empty, CellValue::Number(9.0)],
            row(&[5.0, 6.0]),
        ];
        // The populated row after the sentinel is not re-examined
        assert_eq!(valid_prefix_len(&rows), 2);
        assert_eq!(valid_prefix_len(&[]), 0);
    }

    #[test]
    fn test_ensure_capacity_grows_and_clears() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows("result", 2, vec![row(&[1.0, 2.0]), row(&[3.0, 4.0])]);

        ensure_capacity(&mut wb, "result", 5).unwrap();
        assert_eq!(wb.table_row_count("result").unwrap(), 5);
        let rows = wb.read_table_rows("result", 0..5).unwrap();
        assert!(rows.iter().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_ensure_capacity_idempotent() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table("result", 2);

        ensure_capacity(&mut wb, "result", 3).unwrap();
        wb.write_table_rows("result", 0, &[row(&[7.0, 7.0])]).unwrap();
        ensure_capacity(&mut wb, "result", 3).unwrap();

        assert_eq!(wb.table_row_count("result").unwrap(), 3);
        let rows = wb.read_table_rows("result", 0..3).unwrap();
        assert!(rows.iter().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table("result", 2);
        ensure_capacity(&mut wb, "result", 6).unwrap();
        ensure_capacity(&mut wb, "result", 2).unwrap();

        // Rows beyond the new requirement stay, content-cleared
        assert_eq!(wb.table_row_count("result").unwrap(), 6);
    }

    #[test]
    fn test_copy_full_window() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows(
            "summary",
            2,
            vec![row(&[1.0, 10.0]), row(&[2.0, 20.0]), row(&[3.0, 30.0])],
        );
        wb.define_table("result", 2);
        ensure_capacity(&mut wb, "result", 6).unwrap();

        copy_summary_window(&mut wb, "summary", "result", 3, 2).unwrap();

        let rows = wb.read_table_rows("result", 0..6).unwrap();
        assert!(rows[0].iter().all(|c| c.is_empty()));
        assert_eq!(rows[2], row(&[1.0, 10.0]));
        assert_eq!(rows[4], row(&[3.0, 30.0]));
        assert!(rows[5].iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_copy_back_aligns_long_summary() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows(
            "summary",
            1,
            vec![row(&[1.0]), row(&[2.0]), row(&[3.0]), row(&[4.0])],
        );
        wb.define_table("result", 1);
        ensure_capacity(&mut wb, "result", 2).unwrap();

        copy_summary_window(&mut wb, "summary", "result", 2, 0).unwrap();

        // Last two summary rows win; the leading overrun is discarded
        let rows = wb.read_table_rows("result", 0..2).unwrap();
        assert_eq!(rows[0], row(&[3.0]));
        assert_eq!(rows[1], row(&[4.0]));
    }

    #[test]
    fn test_copy_short_summary_fails() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows("summary", 1, vec![row(&[1.0])]);
        wb.define_table("result", 1);
        ensure_capacity(&mut wb, "result", 3).unwrap();

        let err = copy_summary_window(&mut wb, "summary", "result", 3, 0).unwrap_err();
        assert!(matches!(
            err,
            SweepError::SummaryTooShort { have: 1, need: 3 }
        ));
    }

    #[test]
    fn test_copy_schema_mismatch_surfaces_as_write_failure() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows("summary", 2, vec![row(&[1.0, 2.0])]);
        wb.define_table("result", 3);
        ensure_capacity(&mut wb, "result", 1).unwrap();

        let err = copy_summary_window(&mut wb, "summary", "result", 1, 0).unwrap_err();
        assert!(matches!(err, SweepError::Engine(_)));
    }
}
