//! Stable logical names of the document's input/output regions and tables
//!
//! The sweep addresses the external document exclusively through these names;
//! where a cell or table physically lives is the engine's concern.

// Run-level inputs
pub const INPUT_VALIDATION: &str = "input_validation";
pub const PRODUCT: &str = "product";
pub const BASE_TERM: &str = "base_term";

// Base sweep scratch scenario slots and their dependent input block
pub const INT_RATE_SCENARIO: &str = "int_rate_scenario";
pub const RISK_SCENARIO: &str = "risk_scenario";
pub const PREM_TERM_SCENARIO: &str = "prem_term_scenario";
pub const BASE_SCENARIO_BLOCK: &str = "base_scenario_block";

// Withdrawal schedule tables
pub const TBL_WITHDRAWAL: &str = "withdrawal_input";
pub const TBL_WITHDRAWAL_SCHEDULE: &str = "withdrawal_schedule";

// Base cash-flow tables
pub const TBL_BASE_CF: &str = "base_cf";
pub const TBL_BASE_CF_SUMMARY: &str = "base_cf_summary";
pub const TBL_BASE_CF_RESULT: &str = "base_cf_result";

// Rider input table and scratch slots
pub const TBL_RIDER: &str = "rider_table";
pub const RIDER_SCRATCH: &str = "rider_scratch";
pub const RIDER_RISK: &str = "rider_risk";
pub const RIDER_IS_WAIVER: &str = "rider_is_waiver";
pub const RIDER_TERM: &str = "rider_term";

// Dependent cells of the rider scratch row, recalculated during planning
pub const RIDER_INPUT_BLOCK: &str = "rider_input_block";

// Modal-factor cells that sit outside the managed tables; they must be
// force-recalculated for every rider or stale factors leak into the next one
pub const RIDER_FACTOR_BLOCK: &str = "rider_factor_block";

// Rider cash-flow tables
pub const TBL_RIDER_CF: &str = "rider_cf";
pub const TBL_RIDER_CF_SUMMARY: &str = "rider_cf_summary";
pub const TBL_RIDER_CF_RESULT: &str = "rider_cf_result";
