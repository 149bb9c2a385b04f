//! Spatial discretisation for Spate simulations.
//!
//! - [`Grid`]: a 1D line or 2D plane of uniformly spaced cells, mapping
//!   physical coordinates to array indices.
//! - [`ObstacleMask`]: solid cells rasterised from an [`ObstacleSpec`],
//!   where velocity is forced to zero after every step.
//! - [`Edge`] and [`EdgeBehavior`]: naming of the domain edges and how a
//!   stencil looks past them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;
pub mod obstacle;

pub use edge::{AxisId, Edge, EdgeBehavior};
pub use error::{GridError, ShapeError};
pub use grid::{Axis, Grid};
pub use obstacle::{
    triangle_half_width, ObstacleKind, ObstacleLayout, ObstacleMask, ObstacleShape, ObstacleSpec,
};
