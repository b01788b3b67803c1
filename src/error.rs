//! Run-level error taxonomy
//!
//! No failure is retried anywhere: an engine fault, a short summary window,
//! or a failed validation gate terminates the run immediately. Unknown
//! product codes are absent here: an empty scenario set is a no-op sweep,
//! not an error.

use crate::engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// The document's validation gate rejected the inputs
    #[error("input validation failed, check the input data")]
    ValidationFailed,

    /// The engine produced fewer summary rows than the projection term
    /// requires, so no back-aligned window of the full term exists
    #[error("summary window has {have} rows but the term requires {need}")]
    SummaryTooShort { have: usize, need: usize },

    /// A named cell did not hold the kind of value the sweep expects
    #[error("cell '{slot}' does not hold a {expected}")]
    BadCell {
        slot: String,
        expected: &'static str,
    },

    /// Any engine-side fault: failed recalculation, unknown name, schema
    /// mismatch surfaced by a write
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SweepError {
    pub(crate) fn bad_cell(slot: &str, expected: &'static str) -> Self {
        SweepError::BadCell {
            slot: slot.to_string(),
            expected,
        }
    }
}
