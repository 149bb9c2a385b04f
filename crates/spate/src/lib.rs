//! Spate: an explicit finite-difference solver for the viscous Burgers'
//! equation.
//!
//! This is the facade crate that re-exports the public API of the Spate
//! sub-crates. Flood pulses on a 1D channel, pulsing inflow sources, and
//! 2D river flow past obstacles are all driven through one
//! [`RunConfig`](prelude::RunConfig).
//!
//! # Quick start
//!
//! ```rust
//! use spate::prelude::*;
//!
//! let config = RunConfig {
//!     domain: DomainSpec::Line { length: 28.0, dx: 0.1 },
//!     initial: InitialState::scalar(InitialCondition::GaussianPulse {
//!         center: 5.0,
//!         width: 2.0,
//!         amplitude: 1.0,
//!         baseline: 0.01,
//!     }),
//!     total_time: 1.0,
//!     ..RunConfig::default()
//! };
//! let mut sim = Simulation::new(&config).unwrap();
//! sim.run().unwrap();
//! let history = sim.into_history();
//! assert_eq!(history.len(), 101);
//! assert!(history.last().unwrap().state.peak() < 1.01);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `spate-core` | Field state, step ids, step errors |
//! | [`space`] | `spate-space` | Grids, edges, obstacle masks |
//! | [`propagators`] | `spate-propagators` | Stencil, advection schemes, edge policies |
//! | [`engine`] | `spate-engine` | Configuration, step loop, history, presets |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Field state, step ids, and step errors (`spate-core`).
pub use spate_core as types;

/// Grids and obstacle masks (`spate-space`).
///
/// [`space::Grid`] discretises the domain; [`space::ObstacleMask`] marks the
/// solid cells of one or more bodies.
pub use spate_space as space;

/// The stencil and edge policies (`spate-propagators`).
pub use spate_propagators as propagators;

/// Configuration, the step loop, and history (`spate-engine`).
///
/// [`engine::Simulation`] runs one configuration; [`engine::run_batch`]
/// runs several side by side.
pub use spate_engine as engine;

/// Common imports for typical Spate usage.
///
/// ```rust
/// use spate::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use spate_core::{Component, FieldState, Shape, StepError, StepId};

    // Space
    pub use spate_space::{Grid, ObstacleKind, ObstacleLayout, ObstacleMask, ObstacleSpec};

    // Propagators
    pub use spate_propagators::{
        AdvectionScheme, BoundaryConditions, BoundaryPolicy, EdgeBoundary, SourceForcing,
        SourceKind,
    };

    // Engine
    pub use spate_engine::{
        run_batch, ConfigError, DomainSpec, DtPolicy, HistoryBuffer, InitialCondition,
        InitialState, Phase, RegionOfInterest, RunConfig, RunError, Simulation, Snapshot,
        StabilityAdvisor, StabilityReport,
    };
}
