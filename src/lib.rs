//! Cashflow Sweep - scenario-sweep orchestrator for UVL/ILP cash-flow projections
//!
//! This library provides:
//! - Withdrawal-schedule normalization into dense per-year rows
//! - Scenario-combination enumeration per product
//! - Result-table capacity management and summary-window merging
//! - Base and rider cash-flow sweep runners over an external calculation engine
//! - An in-memory workbook backend for tests and offline runs

pub mod deck;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod sample;
pub mod scenario;
pub mod schedule;
pub mod sweep;
pub mod tables;

// Re-export commonly used types
pub use engine::{CalcEngine, CellValue, ClearScope, EngineError, MemoryWorkbook, RecalcMode};
pub use error::SweepError;
pub use orchestrator::{run_full_sweep, RunReport};
pub use scenario::{combinations, RiskType, Scenario};
pub use schedule::{expand_schedule, normalize_withdrawals, WithdrawalRecord, YearAmount};
pub use sweep::{plan_rider_rows, run_base_sweep, run_rider_sweep, RiderClass, RiderPlan};
