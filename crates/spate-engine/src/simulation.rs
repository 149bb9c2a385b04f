//! The step loop.
//!
//! [`Simulation`] owns the live field and the history for one run. Each
//! [`step()`](Simulation::step) runs stencil, boundaries and obstacle mask
//! against a copy of the committed state, and only commits the copy once
//! every value is finite. A failed step leaves the committed state and the
//! history exactly as they were.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use spate_core::{FieldState, StepError, StepId};
use spate_propagators::{BoundaryConditions, StepIntegrator};
use spate_space::{Grid, ObstacleMask};

use crate::config::{ConfigError, RunConfig};
use crate::history::HistoryBuffer;
use crate::metrics::{RunMetrics, StepMetrics};
use crate::stability::StabilityReport;

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Steps remain.
    Running,
    /// All steps were taken.
    Completed,
    /// A step produced a non-finite value. No further steps are accepted.
    Diverged,
}

/// One run of the Burgers' solver.
///
/// ```
/// use spate_engine::{Phase, RunConfig, Simulation};
///
/// let mut sim = Simulation::new(&RunConfig {
///     total_time: 0.1,
///     ..RunConfig::default()
/// })
/// .unwrap();
/// assert_eq!(sim.total_steps(), 10);
/// sim.run().unwrap();
/// assert_eq!(sim.phase(), Phase::Completed);
/// assert_eq!(sim.history().len(), 11);
/// ```
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    mask: ObstacleMask,
    stepper: StepIntegrator,
    boundaries: BoundaryConditions,
    state: FieldState,
    step: StepId,
    dt: f64,
    total_steps: u64,
    stability: StabilityReport,
    history: HistoryBuffer,
    phase: Phase,
    last_metrics: StepMetrics,
    run_metrics: RunMetrics,
}

impl Simulation {
    /// Validate `config` and bind everything needed to run it.
    ///
    /// The initial field is masked and recorded as frame 0.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] that [`RunConfig::validate`] reports.
    pub fn new(config: &RunConfig) -> Result<Self, ConfigError> {
        let prepared = config.prepare()?;
        log::info!(
            "domain {} ({} cells), nu = {}, scheme = {}, {} obstacle cells",
            config.domain,
            prepared.grid.cell_count(),
            config.nu,
            config.scheme,
            prepared.mask.solid_count()
        );
        log::info!(
            "dt = {}, nt = {}, stride = {}, t_end = {:.4}",
            prepared.dt,
            prepared.steps,
            prepared.stride,
            StepId(prepared.steps).time(prepared.dt)
        );
        if !prepared.stability.stable {
            log::warn!(
                "time step exceeds the {} stability limit: {}",
                prepared.stability.binding(),
                prepared.stability
            );
        }
        if prepared.dt != config.dt {
            log::warn!("dt clamped from {} to {}", config.dt, prepared.dt);
        }

        let mut state = prepared.initial;
        prepared.mask.apply(&mut state)?;
        let frames = prepared.steps / prepared.stride + 1;
        let mut history = HistoryBuffer::new(prepared.stride, frames.min(4096) as usize);
        history.record(StepId(0), 0.0, &state);

        Ok(Self {
            grid: prepared.grid,
            mask: prepared.mask,
            stepper: prepared.stepper,
            boundaries: config.boundaries,
            state,
            step: StepId(0),
            dt: prepared.dt,
            total_steps: prepared.steps,
            stability: prepared.stability,
            history,
            phase: Phase::Running,
            last_metrics: StepMetrics::default(),
            run_metrics: RunMetrics::default(),
        })
    }

    /// Advance one step and return the number of steps now completed.
    ///
    /// Boundary sources see the pre-step time `step · dt`. A frame is taken
    /// when the 0-based step index is a multiple of the stride.
    ///
    /// # Errors
    ///
    /// [`StepError::Diverged`] if the new field holds a NaN or infinity; the
    /// run moves to [`Phase::Diverged`]. [`StepError::RunFinished`] once the
    /// run is no longer [`Phase::Running`].
    pub fn step(&mut self) -> Result<StepId, StepError> {
        if self.phase != Phase::Running {
            return Err(StepError::RunFinished {
                steps_taken: self.step,
            });
        }
        let start = Instant::now();
        let t = self.step.time(self.dt);

        let stencil_start = Instant::now();
        let mut next = self
            .stepper
            .advance(&self.state, &self.grid, self.dt)
            .map_err(|e| self.fail(e))?;
        let stencil_us = stencil_start.elapsed().as_micros() as u64;

        let boundary_start = Instant::now();
        self.boundaries
            .apply(&mut next, &self.grid, t)
            .map_err(|e| self.fail(e))?;
        let boundary_us = boundary_start.elapsed().as_micros() as u64;

        let mask_start = Instant::now();
        self.mask.apply(&mut next).map_err(|e| self.fail(e))?;
        let mask_us = mask_start.elapsed().as_micros() as u64;

        let completed = self.step.next();
        if let Some((component, cell, value)) = next.first_non_finite() {
            self.phase = Phase::Diverged;
            log::error!(
                "diverged at step {completed}, t = {:.4}: {component}[{cell}] = {value}; {}",
                completed.time(self.dt),
                self.stability
            );
            return Err(StepError::Diverged {
                step: completed,
                component,
                cell,
                value,
            });
        }

        // Commit.
        let index = self.step.0;
        self.state = next;
        self.step = completed;

        let mut snapshot_us = 0;
        if index % self.history.stride() == 0 {
            let snapshot_start = Instant::now();
            self.history
                .record(completed, completed.time(self.dt), &self.state);
            snapshot_us = snapshot_start.elapsed().as_micros() as u64;
        }
        if completed.0 >= self.total_steps {
            self.phase = Phase::Completed;
            log::info!(
                "completed {} steps, {} frames, peak = {:.4}",
                completed,
                self.history.len(),
                self.state.peak()
            );
        }

        self.last_metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            stencil_us,
            boundary_us,
            mask_us,
            snapshot_us,
        };
        self.run_metrics.add(&self.last_metrics);
        Ok(completed)
    }

    /// Step until [`Phase::Completed`].
    ///
    /// # Errors
    ///
    /// The first [`StepError`] a step reports.
    pub fn run(&mut self) -> Result<&HistoryBuffer, StepError> {
        while self.phase == Phase::Running {
            self.step()?;
        }
        match self.phase {
            Phase::Diverged => Err(StepError::RunFinished {
                steps_taken: self.step,
            }),
            _ => Ok(&self.history),
        }
    }

    fn fail(&mut self, e: impl fmt::Display) -> StepError {
        self.phase = Phase::Diverged;
        log::error!("step {} failed: {e}", self.step.next());
        StepError::StencilFailed {
            reason: e.to_string(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps committed so far.
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// Simulated time of the committed state.
    pub fn time(&self) -> f64 {
        self.step.time(self.dt)
    }

    /// Time step in use, after any clamping.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Steps the run will take.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// The committed field.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The combined obstacle mask.
    pub fn mask(&self) -> &ObstacleMask {
        &self.mask
    }

    /// Stability check made at construction.
    pub fn stability(&self) -> &StabilityReport {
        &self.stability
    }

    /// Frames recorded so far.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Timings of the last committed step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Timings accumulated over the run.
    pub fn run_metrics(&self) -> &RunMetrics {
        &self.run_metrics
    }

    /// Hand off the history.
    pub fn into_history(self) -> HistoryBuffer {
        self.history
    }
}

// ── RunError ───────────────────────────────────────────────────────

/// A run that could not be built or did not finish.
#[derive(Debug)]
pub enum RunError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// A step failed.
    Step(StepError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Step(e) => write!(f, "{e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

/// Build and run `config` to completion.
///
/// # Errors
///
/// [`RunError::Config`] for a rejected configuration, [`RunError::Step`]
/// if the solution diverges.
pub fn run(config: &RunConfig) -> Result<HistoryBuffer, RunError> {
    let mut sim = Simulation::new(config)?;
    sim.run()?;
    Ok(sim.into_history())
}
