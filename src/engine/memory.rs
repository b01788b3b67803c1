//! In-memory workbook backend
//!
//! Stands in for the external document in tests and in the CLI: named
//! regions hold cells, named tables hold rows, and recalculation hooks
//! registered per region play the role of the document's formulas. A hook
//! runs when `recalculate` is invoked for its region, reading and writing
//! the shared sheet state exactly as dependent formulas would.

use super::{CalcEngine, CellValue, ClearScope, EngineError, RecalcMode};
use std::collections::HashMap;
use std::ops::Range;

/// A named table: fixed column count, growable rows
#[derive(Debug, Clone)]
pub struct Table {
    columns: usize,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Replace all content rows; each row must match the column count
    pub fn set_rows(&mut self, rows: Vec<Vec<CellValue>>) -> Result<(), EngineError> {
        for row in &rows {
            if row.len() != self.columns {
                return Err(EngineError::ColumnCountMismatch {
                    table: String::new(),
                    expected: self.columns,
                    got: row.len(),
                });
            }
        }
        self.rows = rows;
        Ok(())
    }
}

/// The mutable document state shared between the sweep and recalc hooks
#[derive(Debug, Default)]
pub struct SheetState {
    regions: HashMap<String, Vec<CellValue>>,
    tables: HashMap<String, Table>,
}

impl SheetState {
    pub fn scalar(&self, slot: &str) -> Result<&CellValue, EngineError> {
        self.regions
            .get(slot)
            .and_then(|cells| cells.first())
            .ok_or_else(|| EngineError::UnknownRegion(slot.to_string()))
    }

    pub fn set_scalar(&mut self, slot: &str, value: CellValue) -> Result<(), EngineError> {
        let cells = self
            .regions
            .get_mut(slot)
            .ok_or_else(|| EngineError::UnknownRegion(slot.to_string()))?;
        if cells.is_empty() {
            cells.push(value);
        } else {
            cells[0] = value;
        }
        Ok(())
    }

    pub fn region(&self, slot: &str) -> Result<&[CellValue], EngineError> {
        self.regions
            .get(slot)
            .map(|cells| cells.as_slice())
            .ok_or_else(|| EngineError::UnknownRegion(slot.to_string()))
    }

    pub fn table(&self, name: &str) -> Result<&Table, EngineError> {
        self.tables
            .get(name)
            .ok_or_else(|| EngineError::UnknownTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, EngineError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownTable(name.to_string()))
    }

    /// Replace a table's content rows, tagging width errors with the name
    pub fn set_table_rows(
        &mut self,
        name: &str,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<(), EngineError> {
        let table = self.table_mut(name)?;
        table.set_rows(rows).map_err(|e| match e {
            EngineError::ColumnCountMismatch { expected, got, .. } => {
                EngineError::ColumnCountMismatch {
                    table: name.to_string(),
                    expected,
                    got,
                }
            }
            other => other,
        })
    }
}

type RecalcHook = Box<dyn FnMut(&mut SheetState) -> Result<(), EngineError>>;

/// Hook-driven in-memory document
pub struct MemoryWorkbook {
    state: SheetState,
    hooks: HashMap<String, Vec<RecalcHook>>,
    mode: RecalcMode,
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self {
            state: SheetState::default(),
            hooks: HashMap::new(),
            mode: RecalcMode::Automatic,
        }
    }

    /// Declare a named region of `cells` empty cells
    pub fn define_region(&mut self, name: &str, cells: usize) {
        self.state
            .regions
            .insert(name.to_string(), vec![CellValue::Empty; cells]);
    }

    /// Declare a named single-cell region holding `value`
    pub fn define_scalar(&mut self, name: &str, value: CellValue) {
        self.state.regions.insert(name.to_string(), vec![value]);
    }

    /// Declare a named table with a fixed column count and no content rows
    pub fn define_table(&mut self, name: &str, columns: usize) {
        self.state.tables.insert(name.to_string(), Table::new(columns));
    }

    /// Declare a table pre-filled with content rows
    pub fn define_table_with_rows(
        &mut self,
        name: &str,
        columns: usize,
        rows: Vec<Vec<CellValue>>,
    ) {
        let mut table = Table::new(columns);
        table.set_rows(rows).unwrap_or_else(|_| {
            panic!("seed rows for '{}' do not match {} columns", name, columns)
        });
        self.state.tables.insert(name.to_string(), table);
    }

    /// Register a recalculation hook for a named region; hooks for the same
    /// region run in registration order
    pub fn on_recalc<F>(&mut self, region: &str, hook: F)
    where
        F: FnMut(&mut SheetState) -> Result<(), EngineError> + 'static,
    {
        self.hooks
            .entry(region.to_string())
            .or_default()
            .push(Box::new(hook));
    }

    /// Direct state access for test assertions
    pub fn state(&self) -> &SheetState {
        &self.state
    }

    pub fn recalc_mode(&self) -> RecalcMode {
        self.mode
    }

    fn region_mut(&mut self, slot: &str) -> Result<&mut Vec<CellValue>, EngineError> {
        self.state
            .regions
            .get_mut(slot)
            .ok_or_else(|| EngineError::UnknownRegion(slot.to_string()))
    }
}

impl CalcEngine for MemoryWorkbook {
    fn write_scalar(&mut self, slot: &str, value: CellValue) -> Result<(), EngineError> {
        self.state.set_scalar(slot, value)
    }

    fn write_row(&mut self, slot: &str, values: &[CellValue]) -> Result<(), EngineError> {
        let cells = self.region_mut(slot)?;
        if values.len() != cells.len() {
            return Err(EngineError::RegionWidthMismatch {
                region: slot.to_string(),
                expected: cells.len(),
                got: values.len(),
            });
        }
        cells.clone_from_slice(values);
        Ok(())
    }

    fn read_scalar(&self, slot: &str) -> Result<CellValue, EngineError> {
        self.state.scalar(slot).cloned()
    }

    fn recalculate(&mut self, region: &str) -> Result<(), EngineError> {
        match self.hooks.get_mut(region) {
            Some(hooks) => {
                for hook in hooks {
                    hook(&mut self.state)?;
                }
                Ok(())
            }
            // A settled region with no dependent formulas recalculates to
            // itself, but an unknown name is an addressing bug
            None => {
                if self.state.regions.contains_key(region)
                    || self.state.tables.contains_key(region)
                {
                    Ok(())
                } else {
                    Err(EngineError::UnknownRegion(region.to_string()))
                }
            }
        }
    }

    fn table_row_count(&self, table: &str) -> Result<usize, EngineError> {
        Ok(self.state.table(table)?.row_count())
    }

    fn table_column_count(&self, table: &str) -> Result<usize, EngineError> {
        Ok(self.state.table(table)?.columns())
    }

    fn read_table_rows(
        &self,
        table: &str,
        rows: Range<usize>,
    ) -> Result<Vec<Vec<CellValue>>, EngineError> {
        let t = self.state.table(table)?;
        if rows.end > t.row_count() {
            return Err(EngineError::RowOutOfBounds {
                table: table.to_string(),
                row: rows.end,
                rows: t.row_count(),
            });
        }
        Ok(t.rows()[rows].to_vec())
    }

    fn write_table_rows(
        &mut self,
        table: &str,
        start_row: usize,
        rows: &[Vec<CellValue>],
    ) -> Result<(), EngineError> {
        let t = self.state.table_mut(table)?;
        let columns = t.columns();
        let capacity = t.row_count();
        if start_row + rows.len() > capacity {
            return Err(EngineError::RowOutOfBounds {
                table: table.to_string(),
                row: start_row + rows.len(),
                rows: capacity,
            });
        }
        for row in rows {
            if row.len() != columns {
                return Err(EngineError::ColumnCountMismatch {
                    table: table.to_string(),
                    expected: columns,
                    got: row.len(),
                });
            }
        }
        for (offset, row) in rows.iter().enumerate() {
            t.rows[start_row + offset].clone_from_slice(row);
        }
        Ok(())
    }

    fn append_blank_rows(&mut self, table: &str, count: usize) -> Result<(), EngineError> {
        let t = self.state.table_mut(table)?;
        let columns = t.columns();
        for _ in 0..count {
            t.rows.push(vec![CellValue::Empty; columns]);
        }
        Ok(())
    }

    fn clear_table(&mut self, table: &str, _scope: ClearScope) -> Result<(), EngineError> {
        let t = self.state.table_mut(table)?;
        for row in &mut t.rows {
            for cell in row {
                *cell = CellValue::Empty;
            }
        }
        Ok(())
    }

    fn clear_region(&mut self, region: &str, _scope: ClearScope) -> Result<(), EngineError> {
        let cells = self.region_mut(region)?;
        for cell in cells {
            *cell = CellValue::Empty;
        }
        Ok(())
    }

    fn set_recalc_mode(&mut self, mode: RecalcMode) -> Result<(), EngineError> {
        self.mode = mode;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let mut wb = MemoryWorkbook::new();
        wb.define_scalar("term", CellValue::Number(10.0));

        wb.write_scalar("term", CellValue::Number(25.0)).unwrap();
        assert_eq!(wb.read_scalar("term").unwrap(), CellValue::Number(25.0));

        assert!(matches!(
            wb.read_scalar("missing"),
            Err(EngineError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_row_width_enforced() {
        let mut wb = MemoryWorkbook::new();
        wb.define_region("scratch", 3);

        let err = wb
            .write_row("scratch", &[CellValue::Number(1.0)])
            .unwrap_err();
        assert!(matches!(err, EngineError::RegionWidthMismatch { .. }));

        wb.write_row(
            "scratch",
            &["a".into(), CellValue::Number(2.0), CellValue::Empty],
        )
        .unwrap();
        assert_eq!(wb.state().region("scratch").unwrap()[0], "a".into());
    }

    #[test]
    fn test_hooks_run_in_order() {
        let mut wb = MemoryWorkbook::new();
        wb.define_scalar("x", CellValue::Number(1.0));
        wb.on_recalc("block", |state| {
            let x = state.scalar("x")?.as_f64().unwrap_or(0.0);
            state.set_scalar("x", CellValue::Number(x + 1.0))
        });
        wb.on_recalc("block", |state| {
            let x = state.scalar("x")?.as_f64().unwrap_or(0.0);
            state.set_scalar("x", CellValue::Number(x * 10.0))
        });

        wb.recalculate("block").unwrap();
        assert_eq!(wb.read_scalar("x").unwrap(), CellValue::Number(20.0));
    }

    #[test]
    fn test_recalc_of_settled_region_is_noop() {
        let mut wb = MemoryWorkbook::new();
        wb.define_scalar("settled", CellValue::Number(7.0));
        wb.recalculate("settled").unwrap();

        assert!(matches!(
            wb.recalculate("nowhere"),
            Err(EngineError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_table_write_bounds_and_width() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table("result", 2);
        wb.append_blank_rows("result", 2).unwrap();

        let err = wb
            .write_table_rows(
                "result",
                1,
                &[
                    vec![CellValue::Number(1.0); 2],
                    vec![CellValue::Number(1.0); 2],
                ],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::RowOutOfBounds { .. }));

        let err = wb
            .write_table_rows("result", 0, &[vec![CellValue::Number(1.0); 3]])
            .unwrap_err();
        assert!(matches!(err, EngineError::ColumnCountMismatch { .. }));

        wb.write_table_rows("result", 0, &[vec![CellValue::Number(1.0); 2]])
            .unwrap();
        assert_eq!(
            wb.read_table_rows("result", 0..1).unwrap()[0][0],
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn test_clear_table_keeps_capacity() {
        let mut wb = MemoryWorkbook::new();
        wb.define_table_with_rows(
            "result",
            2,
            vec![vec![CellValue::Number(1.0), CellValue::Number(2.0)]],
        );

        wb.clear_table("result", ClearScope::All).unwrap();
        assert_eq!(wb.table_row_count("result").unwrap(), 1);
        assert!(wb.read_table_rows("result", 0..1).unwrap()[0]
            .iter()
            .all(|c| c.is_empty()));
    }
}
