//! Error types for grid and obstacle construction.

use std::fmt;

use spate_core::Shape;

use crate::edge::AxisId;

/// Errors arising from grid construction.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Cell spacing is zero, negative, or not finite.
    InvalidSpacing {
        /// The offending axis.
        axis: AxisId,
        /// The supplied spacing.
        value: f64,
    },
    /// Domain extent is negative or not finite.
    InvalidExtent {
        /// The offending axis.
        axis: AxisId,
        /// The supplied extent.
        value: f64,
    },
    /// The extent does not cover a single cell.
    ExtentTooSmall {
        /// The offending axis.
        axis: AxisId,
        /// The supplied extent.
        extent: f64,
        /// The supplied spacing.
        spacing: f64,
    },
    /// `extent / spacing` asks for more cells than the grid can index.
    TooManyCells {
        /// The offending axis.
        axis: AxisId,
        /// Requested cell count (saturated).
        requested: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpacing { axis, value } => {
                write!(f, "d{axis} must be finite and positive, got {value}")
            }
            Self::InvalidExtent { axis, value } => {
                write!(f, "L{axis} must be finite and non-negative, got {value}")
            }
            Self::ExtentTooSmall {
                axis,
                extent,
                spacing,
            } => write!(
                f,
                "L{axis} = {extent} is smaller than one cell (d{axis} = {spacing})"
            ),
            Self::TooManyCells { axis, requested } => {
                write!(f, "{requested} cells along {axis} exceeds the supported maximum")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Errors arising from obstacle rasterisation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// A size parameter (half-size, radius, height, ...) is zero.
    NonPositiveSize {
        /// Shape kind.
        kind: &'static str,
        /// Name of the zero parameter.
        parameter: &'static str,
    },
    /// The rasterised shape reaches past the grid.
    OutOfGrid {
        /// Shape kind.
        kind: &'static str,
        /// What fell outside.
        reason: String,
    },
    /// Solid bodies are only defined on 2D grids.
    RequiresPlane {
        /// Shape kind.
        kind: &'static str,
    },
    /// Two masks over different grids were combined.
    ShapeMismatch {
        /// Shape of the receiver.
        left: Shape,
        /// Shape of the argument.
        right: Shape,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveSize { kind, parameter } => {
                write!(f, "{kind}: {parameter} must be positive")
            }
            Self::OutOfGrid { kind, reason } => write!(f, "{kind} outside grid: {reason}"),
            Self::RequiresPlane { kind } => write!(f, "{kind} obstacle requires a 2D grid"),
            Self::ShapeMismatch { left, right } => {
                write!(f, "cannot combine masks of shape {left:?} and {right:?}")
            }
        }
    }
}

impl std::error::Error for ShapeError {}
