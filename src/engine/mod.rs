//! Calculation engine interface
//!
//! The sweep never evaluates a formula itself: all actuarial arithmetic lives
//! in an external tabular calculation engine (a workbook-style document with
//! named input regions, named tables, and dependent formulas). This module
//! defines the contract the sweep drives that engine through: write scratch
//! inputs, force a synchronous recalculation of a named region, read settled
//! outputs back.
//!
//! The engine is deterministic given its current scratch-input state and a
//! settled recalculation, and carries no memory of prior scenarios. All
//! addressing is by stable logical name; physical sheet layout is the
//! engine's concern.

pub mod memory;
pub mod names;

pub use memory::{MemoryWorkbook, SheetState, Table};

use std::ops::Range;
use thiserror::Error;

/// Errors surfaced by an engine backend
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("region '{region}' holds {expected} cells, got {got}")]
    RegionWidthMismatch {
        region: String,
        expected: usize,
        got: usize,
    },

    #[error("table '{table}' has {expected} columns, got a row of {got}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    #[error("row {row} out of bounds for table '{table}' ({rows} rows)")]
    RowOutOfBounds {
        table: String,
        row: usize,
        rows: usize,
    },

    #[error("recalculation of '{region}' failed: {message}")]
    RecalcFailed { region: String, message: String },
}

/// A single cell's content
///
/// Empty cells are distinct from zero: an empty leading cell is the sentinel
/// that terminates input record sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Empty cell or empty string, the sentinel convention for input tables
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Non-negative whole number, e.g. a projection term or a year
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            CellValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_usize().and_then(|n| u32::try_from(n).ok())
    }

    /// Booleans stored as TRUE/FALSE or as 0/1 flags
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// What a clear operation removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Cell contents only
    Contents,
    /// Contents plus any derived formatting
    All,
}

/// Engine recalculation mode
///
/// The sweep runs the document in manual mode so that each scenario's
/// recalculation is an explicit, bounded round trip, and restores automatic
/// mode when the run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalcMode {
    Manual,
    Automatic,
}

/// Exclusive handle to the external calculation document
///
/// Every interaction is a blocking round trip. The sweep holds the handle by
/// `&mut` for the duration of a run: scenario i+1's writes can never overtake
/// scenario i's reads because there is no second path to the document.
pub trait CalcEngine {
    /// Write a single value into a named scratch input cell
    fn write_scalar(&mut self, slot: &str, value: CellValue) -> Result<(), EngineError>;

    /// Write a full row of values into a named scratch input region
    fn write_row(&mut self, slot: &str, values: &[CellValue]) -> Result<(), EngineError>;

    /// Read a named single-cell output
    fn read_scalar(&self, slot: &str) -> Result<CellValue, EngineError>;

    /// Force dependent formulas of the named region (and only that region)
    /// to reflect current scratch inputs; returns once settled
    fn recalculate(&mut self, region: &str) -> Result<(), EngineError>;

    /// Current number of content rows in a table
    fn table_row_count(&self, table: &str) -> Result<usize, EngineError>;

    /// Declared column count of a table
    fn table_column_count(&self, table: &str) -> Result<usize, EngineError>;

    /// Read a contiguous window of content rows
    fn read_table_rows(
        &self,
        table: &str,
        rows: Range<usize>,
    ) -> Result<Vec<Vec<CellValue>>, EngineError>;

    /// Overwrite content rows starting at `start_row`; fails when a row's
    /// width does not match the table's column count or the window runs past
    /// the table's current capacity
    fn write_table_rows(
        &mut self,
        table: &str,
        start_row: usize,
        rows: &[Vec<CellValue>],
    ) -> Result<(), EngineError>;

    /// Append blank rows at the table's declared column width
    fn append_blank_rows(&mut self, table: &str, count: usize) -> Result<(), EngineError>;

    /// Clear every content row of a table, keeping the rows themselves
    fn clear_table(&mut self, table: &str, scope: ClearScope) -> Result<(), EngineError>;

    /// Clear a named input region
    fn clear_region(&mut self, region: &str, scope: ClearScope) -> Result<(), EngineError>;

    /// Switch the document's recalculation mode
    fn set_recalc_mode(&mut self, mode: RecalcMode) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_detection() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Text("UVL01".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(CellValue::Number(10.0).as_usize(), Some(10));
        assert_eq!(CellValue::Number(10.5).as_usize(), None);
        assert_eq!(CellValue::Number(-1.0).as_usize(), None);
        assert_eq!(CellValue::Text("10".into()).as_usize(), None);
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(CellValue::Bool(true).as_bool(), Some(true));
        assert_eq!(CellValue::Number(1.0).as_bool(), Some(true));
        assert_eq!(CellValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(CellValue::Text("TRUE".into()).as_bool(), None);
    }
}
