//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is the input for constructing a [`Simulation`](crate::Simulation).
//! [`validate()`](RunConfig::validate) checks every invariant up front;
//! [`Simulation::new`](crate::Simulation::new) runs the same checks and
//! keeps the pieces it builds.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spate_core::{FieldError, FieldState};
use spate_propagators::{AdvectionScheme, BoundaryConditions, PropagatorError, StepIntegrator};
use spate_space::{Grid, GridError, ObstacleMask, ObstacleSpec, ShapeError};

use crate::history::HistoryBuffer;
use crate::initial::{InitialCondition, InitialState};
use crate::stability::{StabilityAdvisor, StabilityReport};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating or loading a [`RunConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The domain could not be discretised.
    Grid(GridError),
    /// An obstacle could not be rasterised.
    Shape(ShapeError),
    /// Boundary or stencil parameters were rejected.
    Propagator(PropagatorError),
    /// The initial field does not fit the grid.
    Field(FieldError),
    /// A numeric parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A setting requires a different number of dimensions.
    DimensionMismatch {
        /// What disagreed.
        reason: String,
    },
    /// An explicit initial field has the wrong number of values.
    InitialLength {
        /// Cells on the grid.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
    /// `dt` exceeds the stability limit and the policy is
    /// [`DtPolicy::Reject`].
    UnstableTimeStep {
        /// The stability check that failed.
        report: StabilityReport,
    },
    /// The configuration file could not be read.
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The configuration text is not valid YAML for a [`RunConfig`].
    Parse(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Shape(e) => write!(f, "obstacle: {e}"),
            Self::Propagator(e) => write!(f, "boundary: {e}"),
            Self::Field(e) => write!(f, "initial field: {e}"),
            Self::InvalidParameter { name, value } => write!(f, "invalid {name}: {value}"),
            Self::DimensionMismatch { reason } => write!(f, "dimension mismatch: {reason}"),
            Self::InitialLength { expected, actual } => {
                write!(f, "initial field has {actual} values, grid has {expected} cells")
            }
            Self::UnstableTimeStep { report } => write!(f, "unstable time step: {report}"),
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Shape(e) => Some(e),
            Self::Propagator(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ShapeError> for ConfigError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<PropagatorError> for ConfigError {
    fn from(e: PropagatorError) -> Self {
        Self::Propagator(e)
    }
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

// ── DomainSpec ─────────────────────────────────────────────────────

/// Physical extent and spacing of the domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainSpec {
    /// `[0, length]` with spacing `dx`.
    Line {
        /// Extent along x.
        length: f64,
        /// Spacing along x.
        dx: f64,
    },
    /// `[0, length_x] × [0, length_y]`.
    Plane {
        /// Extent along x.
        length_x: f64,
        /// Spacing along x.
        dx: f64,
        /// Extent along y.
        length_y: f64,
        /// Spacing along y.
        dy: f64,
    },
}

impl DomainSpec {
    /// Discretise the domain.
    pub fn grid(&self) -> Result<Grid, GridError> {
        match *self {
            Self::Line { length, dx } => Grid::line(length, dx),
            Self::Plane {
                length_x,
                dx,
                length_y,
                dy,
            } => Grid::plane(length_x, dx, length_y, dy),
        }
    }
}

impl fmt::Display for DomainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line { length, dx } => write!(f, "line L = {length}, dx = {dx}"),
            Self::Plane {
                length_x,
                dx,
                length_y,
                dy,
            } => write!(
                f,
                "plane {length_x} x {length_y}, dx = {dx}, dy = {dy}"
            ),
        }
    }
}

// ── DtPolicy ───────────────────────────────────────────────────────

/// What to do when `dt` exceeds the stability limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtPolicy {
    /// Log a warning and run with the configured `dt`.
    #[default]
    Warn,
    /// Refuse the configuration with [`ConfigError::UnstableTimeStep`].
    Reject,
    /// Run with `dt` reduced to the tighter limit.
    Clamp,
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Everything needed to run one simulation.
///
/// Missing YAML keys take their [`Default`] values; a malformed document is
/// an error, never a silent fallback.
///
/// ```
/// use spate_engine::RunConfig;
///
/// let cfg = RunConfig::from_yaml_str(
///     "domain: { kind: line, length: 10.0, dx: 0.1 }\ntotal_time: 1.0\n",
/// )
/// .unwrap();
/// assert_eq!(cfg.target_frames, 200);
/// cfg.validate().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Domain extent and spacing.
    pub domain: DomainSpec,
    /// Time step.
    pub dt: f64,
    /// Kinematic viscosity.
    pub nu: f64,
    /// Advection discretisation.
    pub scheme: AdvectionScheme,
    /// Solid bodies, combined by union. Empty means no obstacles.
    pub obstacles: Vec<ObstacleSpec>,
    /// Per-edge, per-component boundary policies.
    pub boundaries: BoundaryConditions,
    /// Field at step 0.
    pub initial: InitialState,
    /// Simulated time to cover.
    pub total_time: f64,
    /// Approximate number of frames to keep.
    pub target_frames: u64,
    /// Hard ceiling on the number of steps.
    pub max_steps: u64,
    /// Speed used for the advective limit. Defaults to the largest
    /// magnitude in the initial field or on a source edge.
    pub characteristic_speed: Option<f64>,
    /// Response to an unstable `dt`.
    pub dt_policy: DtPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            domain: DomainSpec::Line {
                length: 28.0,
                dx: 0.1,
            },
            dt: 0.01,
            nu: 0.1,
            scheme: AdvectionScheme::Central,
            obstacles: Vec::new(),
            boundaries: BoundaryConditions::default(),
            initial: InitialState::scalar(InitialCondition::GaussianPulse {
                center: 5.0,
                width: 2.0,
                amplitude: 1.0,
                baseline: 0.01,
            }),
            total_time: 5.0,
            target_frames: 200,
            max_steps: 50_000,
            characteristic_speed: None,
            dt_policy: DtPolicy::Warn,
        }
    }
}

/// A configuration that passed validation, with everything built.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub grid: Grid,
    pub mask: ObstacleMask,
    pub stepper: StepIntegrator,
    pub initial: FieldState,
    pub stability: StabilityReport,
    pub dt: f64,
    pub steps: u64,
    pub stride: u64,
}

impl RunConfig {
    /// Parse a YAML document.
    ///
    /// Enum values with data are written as single-key maps
    /// (`{ fixed: 0.0 }`, `source: { ... }`), not YAML tags.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let de = serde_yaml::Deserializer::from_str(text);
        Ok(serde_yaml::with::singleton_map_recursive::deserialize(de)?)
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialise to YAML in the form [`from_yaml_str`](Self::from_yaml_str)
    /// reads.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        let mut buf = Vec::new();
        {
            let mut ser = serde_yaml::Serializer::new(&mut buf);
            serde_yaml::with::singleton_map_recursive::serialize(self, &mut ser)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Number of steps: `⌊total_time / dt⌋`, capped at `max_steps`.
    pub fn step_count(&self, dt: f64) -> u64 {
        // Tolerance so that 5.0 / 0.01 is 500, not 499.
        let raw = (self.total_time / dt * (1.0 + 1e-12)).floor();
        if raw >= self.max_steps as f64 {
            self.max_steps
        } else {
            raw as u64
        }
    }

    /// Check every invariant without running anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The built pieces are discarded; Simulation::new rebuilds them.
        let _ = self.prepare()?;
        Ok(())
    }

    pub(crate) fn prepare(&self) -> Result<Prepared, ConfigError> {
        // 1. Scalars.
        positive("dt", self.dt)?;
        positive("total_time", self.total_time)?;
        if !self.nu.is_finite() || self.nu < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "nu",
                value: self.nu,
            });
        }
        if self.target_frames == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "target_frames",
                value: 0.0,
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_steps",
                value: 0.0,
            });
        }
        if let Some(speed) = self.characteristic_speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "characteristic_speed",
                    value: speed,
                });
            }
        }

        // 2. Grid, obstacles, boundaries, seed.
        let grid = self.domain.grid()?;
        let mask = ObstacleMask::build_all(&self.obstacles, &grid)?;
        let (x_edge, y_edge) = self.boundaries.edge_behavior(&grid)?;
        let stepper = StepIntegrator::builder()
            .viscosity(self.nu)
            .scheme(self.scheme)
            .x_edge(x_edge)
            .y_edge(y_edge)
            .build()?;
        let initial = self.initial.seed(&grid)?;

        // 3. Stability.
        let speed = self
            .characteristic_speed
            .unwrap_or_else(|| initial.max_abs().max(self.boundaries.max_source_value(&grid)));
        let advisor = StabilityAdvisor::new(&grid, self.nu, speed);
        let stability = advisor.recommend(self.dt);
        let dt = match self.dt_policy {
            _ if stability.stable => self.dt,
            DtPolicy::Warn => self.dt,
            DtPolicy::Reject => return Err(ConfigError::UnstableTimeStep { report: stability }),
            DtPolicy::Clamp => stability.limit(),
        };

        // 4. Step budget.
        let steps = self.step_count(dt);
        if steps == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "total_time",
                value: self.total_time,
            });
        }
        let stride = HistoryBuffer::stride_for(steps, self.target_frames);

        Ok(Prepared {
            grid,
            mask,
            stepper,
            initial,
            stability,
            dt,
            steps,
            stride,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(())
}
