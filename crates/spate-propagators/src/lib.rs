//! Finite-difference stencils and boundary policies for Spate.
//!
//! # Step order
//!
//! 1. [`StepIntegrator::advance`]: diffusion and advection on every cell,
//!    reading only the previous state.
//! 2. [`BoundaryConditions::apply`]: each edge overwrites its cells.
//!
//! Obstacle masking follows in the engine.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod advection;
pub mod boundary;
pub mod error;
pub(crate) mod grid_helpers;
pub mod integrator;

pub use advection::AdvectionScheme;
pub use boundary::{BoundaryConditions, BoundaryPolicy, EdgeBoundary, SourceForcing, SourceKind};
pub use error::PropagatorError;
pub use integrator::{StepIntegrator, StepIntegratorBuilder};
