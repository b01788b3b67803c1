//! Withdrawal schedule normalization
//!
//! Planned withdrawals arrive as sparse year-range records (start year, end
//! year, amount). The projection formulas index withdrawals by single year,
//! so the sparse records are expanded into one dense (year, amount) row per
//! covered year and written back to the schedule table the formulas read.

use crate::engine::{names, CalcEngine, CellValue};
use crate::error::SweepError;
use crate::tables::{ensure_capacity, valid_prefix_len};
use log::debug;
use serde::{Deserialize, Serialize};

/// A sparse withdrawal instruction covering a year range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub start_year: u32,
    pub end_year: u32,
    pub amount: f64,
}

/// One dense schedule row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAmount {
    pub year: u32,
    pub amount: f64,
}

/// Expand sparse records into one row per covered year
///
/// A record whose end year precedes its start year covers no years and
/// contributes nothing; that is not validated, it simply expands to zero
/// rows.
pub fn expand_schedule(records: &[WithdrawalRecord]) -> Vec<YearAmount> {
    let mut expanded = Vec::new();
    for record in records {
        for year in record.start_year..=record.end_year {
            expanded.push(YearAmount {
                year,
                amount: record.amount,
            });
        }
    }
    expanded
}

/// Parse the valid (non-sentinel) prefix of the withdrawal input table
fn parse_records(rows: &[Vec<CellValue>]) -> Result<Vec<WithdrawalRecord>, SweepError> {
    let prefix = valid_prefix_len(rows);

    rows[..prefix]
        .iter()
        .map(|row| {
            let start_year = row
                .first()
                .and_then(CellValue::as_u32)
                .ok_or_else(|| SweepError::bad_cell(names::TBL_WITHDRAWAL, "start year"))?;
            let end_year = row
                .get(1)
                .and_then(CellValue::as_u32)
                .ok_or_else(|| SweepError::bad_cell(names::TBL_WITHDRAWAL, "end year"))?;
            let amount = row
                .get(2)
                .and_then(CellValue::as_f64)
                .ok_or_else(|| SweepError::bad_cell(names::TBL_WITHDRAWAL, "amount"))?;

            Ok(WithdrawalRecord {
                start_year,
                end_year,
                amount,
            })
        })
        .collect()
}

/// Normalize the withdrawal input table into the dense schedule table
///
/// When the expansion is empty there is nothing to write and the schedule
/// table is left untouched; an empty input must not truncate rows a prior
/// run produced. Returns the number of schedule rows written.
pub fn normalize_withdrawals(engine: &mut dyn CalcEngine) -> Result<usize, SweepError> {
    let count = engine.table_row_count(names::TBL_WITHDRAWAL)?;
    let rows = engine.read_table_rows(names::TBL_WITHDRAWAL, 0..count)?;
    let records = parse_records(&rows)?;
    let expanded = expand_schedule(&records);

    if expanded.is_empty() {
        debug!("withdrawal schedule: nothing to normalize");
        return Ok(0);
    }

    ensure_capacity(engine, names::TBL_WITHDRAWAL_SCHEDULE, expanded.len())?;

    let schedule_rows: Vec<Vec<CellValue>> = expanded
        .iter()
        .map(|ya| vec![ya.year.into(), ya.amount.into()])
        .collect();
    engine.write_table_rows(names::TBL_WITHDRAWAL_SCHEDULE, 0, &schedule_rows)?;

    debug!("withdrawal schedule: {} rows", schedule_rows.len());
    Ok(schedule_rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryWorkbook;

    fn record(start: u32, end: u32, amount: f64) -> WithdrawalRecord {
        WithdrawalRecord {
            start_year: start,
            end_year: end,
            amount,
        }
    }

    fn workbook_with_input(rows: Vec<Vec<CellValue>>) -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows(names::TBL_WITHDRAWAL, 3, rows);
        wb.define_table(names::TBL_WITHDRAWAL_SCHEDULE, 2);
        wb
    }

    #[test]
    fn test_expansion_count_matches_year_spans() {
        let records = vec![record(2025, 2027, 100.0), record(2030, 2030, 50.0)];
        let expanded = expand_schedule(&records);

        // Sum of (end - start + 1) over all records
        assert_eq!(expanded.len(), 4);
        assert!(expanded.iter().take(3).all(|ya| ya.amount == 100.0));
        assert_eq!(expanded[3], YearAmount { year: 2030, amount: 50.0 });
    }

    #[test]
    fn test_expansion_of_single_range() {
        let expanded = expand_schedule(&[record(2025, 2027, 100.0)]);
        let expected = vec![
            YearAmount { year: 2025, amount: 100.0 },
            YearAmount { year: 2026, amount: 100.0 },
            YearAmount { year: 2027, amount: 100.0 },
        ];
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_inverted_range_expands_to_nothing() {
        assert!(expand_schedule(&[record(2030, 2025, 100.0)]).is_empty());
    }

    #[test]
    fn test_normalize_writes_dense_rows() {
        let mut wb = workbook_with_input(vec![
            vec![2025u32.into(), 2027u32.into(), 100.0.into()],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
        ]);

        let written = normalize_withdrawals(&mut wb).unwrap();
        assert_eq!(written, 3);

        let rows = wb.read_table_rows(names::TBL_WITHDRAWAL_SCHEDULE, 0..3).unwrap();
        assert_eq!(rows[0], vec![2025u32.into(), 100.0.into()]);
        assert_eq!(rows[1], vec![2026u32.into(), 100.0.into()]);
        assert_eq!(rows[2], vec![2027u32.into(), 100.0.into()]);
    }

    #[test]
    fn test_normalize_stops_at_sentinel() {
        // The record after the blank row is never examined
        let mut wb = workbook_with_input(vec![
            vec![2025u32.into(), 2025u32.into(), 100.0.into()],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![2030u32.into(), 2031u32.into(), 999.0.into()],
        ]);

        let written = normalize_withdrawals(&mut wb).unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn test_empty_input_leaves_schedule_untouched() {
        let mut wb = workbook_with_input(vec![vec![
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
        ]]);
        // Rows from an earlier run
        wb.define_table_with_rows(
            names::TBL_WITHDRAWAL_SCHEDULE,
            2,
            vec![vec![2020u32.into(), 75.0.into()]],
        );

        let written = normalize_withdrawals(&mut wb).unwrap();
        assert_eq!(written, 0);

        let rows = wb.read_table_rows(names::TBL_WITHDRAWAL_SCHEDULE, 0..1).unwrap();
        assert_eq!(rows[0], vec![2020u32.into(), 75.0.into()]);
    }
}
