//! Error types raised while building or advancing field state.
//!
//! Construction problems with grids, obstacles and configuration live in
//! the crates that own those types; this module only covers what can go
//! wrong with the field arrays themselves and with a running step loop.

use std::error::Error;
use std::fmt;

use crate::field::Component;
use crate::id::StepId;

/// Errors from the step loop.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A step produced a NaN or infinite value.
    ///
    /// Explicit schemes blow up like this when `dt` exceeds the stability
    /// limit. The run cannot continue, but retrying with a smaller `dt`
    /// is legitimate.
    Diverged {
        /// The step whose output contained the value.
        step: StepId,
        /// Which velocity component held the value.
        component: Component,
        /// Flat (row-major) index of the first offending cell.
        cell: usize,
        /// The offending value.
        value: f64,
    },
    /// The stencil, a boundary policy or the obstacle mask rejected the
    /// state. The live state is left at the last committed step.
    StencilFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The run already completed or failed; no further steps are accepted.
    RunFinished {
        /// Number of steps that were taken before the run stopped.
        steps_taken: StepId,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diverged {
                step,
                component,
                cell,
                value,
            } => write!(
                f,
                "solution diverged at step {step}: {component}[{cell}] = {value}"
            ),
            Self::StencilFailed { reason } => write!(f, "step failed: {reason}"),
            Self::RunFinished { steps_taken } => {
                write!(f, "run already finished after {steps_taken} steps")
            }
        }
    }
}

impl Error for StepError {}

/// Errors from constructing a [`FieldState`](crate::FieldState).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A component array does not match the number of cells in the shape.
    LengthMismatch {
        /// The component with the wrong length.
        component: Component,
        /// Cell count implied by the shape.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                component,
                expected,
                actual,
            } => write!(
                f,
                "component {component} has {actual} values, grid has {expected} cells"
            ),
        }
    }
}

impl Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diverged_display_names_step_and_cell() {
        let err = StepError::Diverged {
            step: StepId(17),
            component: Component::V,
            cell: 42,
            value: f64::NAN,
        };
        let msg = err.to_string();
        assert!(msg.contains("step 17"));
        assert!(msg.contains("v[42]"));
    }

    #[test]
    fn length_mismatch_display() {
        let err = FieldError::LengthMismatch {
            component: Component::U,
            expected: 10,
            actual: 9,
        };
        assert_eq!(err.to_string(), "component u has 9 values, grid has 10 cells");
    }
}
