//! Scenario sweep runners
//!
//! Base policy cash flows and rider cash flows are swept separately: the
//! base sweep walks the product's scenario combinations, the rider sweep
//! walks every rider record under both risk classes. Both drive the same
//! engine handle sequentially: each scenario's scratch writes must be fully
//! recalculated and read back before the next scenario's writes begin.

mod base;
mod rider;

pub use base::run_base_sweep;
pub use rider::{plan_rider_rows, run_rider_sweep, RiderClass, RiderPlan};
