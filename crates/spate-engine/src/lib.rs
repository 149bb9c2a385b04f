//! Simulation engine for the Spate Burgers' equation solver.
//!
//! [`RunConfig`] describes a run; [`Simulation`] validates it, binds the
//! grid, obstacle mask, stencil and edge policies, and steps the field
//! while sampling frames into a [`HistoryBuffer`]. Independent runs can be
//! executed side by side with [`run_batch`], and [`scenario`] holds the
//! built-in presets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batched;
pub mod config;
pub mod history;
pub mod initial;
pub mod metrics;
pub mod scenario;
pub mod simulation;
pub mod stability;

pub use batched::{run_batch, BatchError};
pub use config::{ConfigError, DomainSpec, DtPolicy, RunConfig};
pub use history::{HistoryBuffer, RegionOfInterest, Snapshot};
pub use initial::{InitialCondition, InitialState};
pub use metrics::{RunMetrics, StepMetrics};
pub use scenario::Scenario;
pub use simulation::{run, Phase, RunError, Simulation};
pub use stability::{StabilityAdvisor, StabilityReport};
