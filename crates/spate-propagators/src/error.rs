//! Errors from stencil and boundary configuration.

use std::error::Error;
use std::fmt;

use spate_core::Shape;
use spate_space::AxisId;

/// Errors raised while configuring or running a stencil.
#[derive(Clone, Debug, PartialEq)]
pub enum PropagatorError {
    /// A numeric parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// Only one edge of an axis is periodic, or the two components of an
    /// edge disagree about periodicity.
    UnpairedPeriodic {
        /// The affected axis.
        axis: AxisId,
    },
    /// The field does not live on the grid it was stepped with.
    ShapeMismatch {
        /// Shape of the grid.
        grid: Shape,
        /// Shape of the field.
        field: Shape,
    },
}

impl fmt::Display for PropagatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
            Self::UnpairedPeriodic { axis } => write!(
                f,
                "periodic boundary on the {axis} axis must be set on both edges and both components"
            ),
            Self::ShapeMismatch { grid, field } => {
                write!(f, "field shape {field:?} does not match grid shape {grid:?}")
            }
        }
    }
}

impl Error for PropagatorError {}
