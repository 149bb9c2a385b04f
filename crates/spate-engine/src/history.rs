//! Sampled snapshots of a run.
//!
//! [`HistoryBuffer`] is append-only while the run owns it and read-only once
//! handed off. Every [`Snapshot`] is a deep copy, independent of the live
//! field.

use std::ops::Range;

use spate_core::{FieldState, StepId};
use spate_space::Grid;

use crate::config::ConfigError;

/// One sampled frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Steps completed when the frame was taken.
    pub step: StepId,
    /// Simulated time of the frame.
    pub time: f64,
    /// Field values.
    pub state: FieldState,
}

/// Ordered frames sampled every `stride` steps, starting with the initial
/// condition.
///
/// After frame 0, the state produced by 0-based step `n` is kept when
/// `n % stride == 0`, so frames land at steps `1, 1 + stride, ...`. The
/// final state of a run is only included when `nt - 1` is a multiple of the
/// stride; read it from [`Simulation::state`](crate::Simulation::state)
/// when the last frame is not enough.
///
/// ```
/// use spate_engine::{RunConfig, Simulation};
///
/// let mut sim = Simulation::new(&RunConfig {
///     total_time: 0.2,
///     target_frames: 5,
///     ..RunConfig::default()
/// })
/// .unwrap();
/// sim.run().unwrap();
/// // 20 steps at stride 4: frames at steps 0, 1, 5, 9, 13, 17.
/// assert_eq!(sim.current_step().0, 20);
/// assert_eq!(sim.history().len(), 6);
/// assert_eq!(sim.history().last().unwrap().step.0, 17);
/// assert_ne!(&sim.history().last().unwrap().state, sim.state());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryBuffer {
    stride: u64,
    frames: Vec<Snapshot>,
}

impl HistoryBuffer {
    /// Sampling stride for `steps` steps and about `target_frames` frames:
    /// `max(1, steps / target_frames)`.
    pub fn stride_for(steps: u64, target_frames: u64) -> u64 {
        (steps / target_frames.max(1)).max(1)
    }

    /// An empty buffer sampling every `stride` steps.
    pub(crate) fn new(stride: u64, capacity: usize) -> Self {
        Self {
            stride: stride.max(1),
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Append a copy of `state`.
    pub(crate) fn record(&mut self, step: StepId, time: f64, state: &FieldState) {
        debug_assert!(self.frames.last().is_none_or(|f| f.step < step));
        log::debug!("snapshot {} at step {step}, t = {time:.4}", self.frames.len());
        self.frames.push(Snapshot {
            step,
            time,
            state: state.clone(),
        });
    }

    /// Sampling stride in steps.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames, oldest first.
    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    /// Frame `i`.
    pub fn get(&self, i: usize) -> Option<&Snapshot> {
        self.frames.get(i)
    }

    /// The initial condition.
    pub fn first(&self) -> Option<&Snapshot> {
        self.frames.first()
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&Snapshot> {
        self.frames.last()
    }

    /// Iterate frames, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.frames.iter()
    }

    /// Frame times.
    pub fn times(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }

    /// `(time, Σ u · cell measure)` over `region` for every frame.
    pub fn region_series(&self, region: &RegionOfInterest) -> Vec<(f64, f64)> {
        self.frames
            .iter()
            .map(|f| (f.time, region.integrate(&f.state)))
            .collect()
    }

    /// Take the frames.
    pub fn into_frames(self) -> Vec<Snapshot> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// A band of columns whose integrated value is reported.
///
/// On a line this is `Σ u[a..b] · dx`; on a plane every row contributes and
/// the measure is `dx · dy`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionOfInterest {
    columns: Range<usize>,
    cell_measure: f64,
}

impl RegionOfInterest {
    /// Columns `a..b` of `grid`, clipped to the grid.
    pub fn from_indices(grid: &Grid, columns: Range<usize>) -> Self {
        let end = columns.end.min(grid.nx());
        Self {
            columns: columns.start.min(end)..end,
            cell_measure: grid.cell_measure(),
        }
    }

    /// Cells whose x-coordinate lies in `[x0, x1]`.
    ///
    /// # Errors
    ///
    /// Non-finite bounds, or `x0 > x1`.
    pub fn from_physical(grid: &Grid, x0: f64, x1: f64) -> Result<Self, ConfigError> {
        for (name, value) in [("region start", x0), ("region end", x1)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        if x0 > x1 {
            return Err(ConfigError::InvalidParameter {
                name: "region end",
                value: x1,
            });
        }
        Ok(Self {
            columns: grid.x_axis().cells_within(x0, x1),
            cell_measure: grid.cell_measure(),
        })
    }

    /// Column index range.
    pub fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    /// Integrated `u` over the region.
    pub fn integrate(&self, state: &FieldState) -> f64 {
        state.integrate(self.columns.clone(), self.cell_measure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spate_core::Shape;

    #[test]
    fn stride_matches_target_frames() {
        assert_eq!(HistoryBuffer::stride_for(2000, 200), 10);
        assert_eq!(HistoryBuffer::stride_for(150, 200), 1);
        assert_eq!(HistoryBuffer::stride_for(2099, 200), 10);
        assert_eq!(HistoryBuffer::stride_for(10, 0), 10);
    }

    #[test]
    fn snapshots_are_deep_copies() {
        let shape = Shape::Line { nx: 3 };
        let mut live = FieldState::filled(shape, 1.0);
        let mut h = HistoryBuffer::new(1, 2);
        h.record(StepId(0), 0.0, &live);
        live.u_mut()[0] = 99.0;
        h.record(StepId(1), 0.1, &live);
        assert_eq!(h.frames()[0].state.u()[0], 1.0);
        assert_eq!(h.frames()[1].state.u()[0], 99.0);
        assert_eq!(h.times(), vec![0.0, 0.1]);
    }

    #[test]
    fn region_from_physical_bounds() {
        let g = Grid::line(28.0, 0.1).unwrap();
        let r = RegionOfInterest::from_physical(&g, 16.0, 24.0).unwrap();
        assert_eq!(r.columns(), 160..241);
        assert!(RegionOfInterest::from_physical(&g, 5.0, 1.0).is_err());
        assert!(RegionOfInterest::from_physical(&g, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn region_series_integrates_every_frame() {
        let g = Grid::line(4.0, 0.5).unwrap(); // 9 cells
        let region = RegionOfInterest::from_indices(&g, 2..6);
        let mut h = HistoryBuffer::new(1, 2);
        h.record(StepId(0), 0.0, &FieldState::filled(g.shape(), 1.0));
        h.record(StepId(1), 0.5, &FieldState::filled(g.shape(), 2.0));
        let series = h.region_series(&region);
        assert_eq!(series, vec![(0.0, 2.0), (0.5, 4.0)]);
    }

    #[test]
    fn region_indices_clip_to_grid() {
        let g = Grid::line(1.0, 0.5).unwrap();
        assert_eq!(RegionOfInterest::from_indices(&g, 1..10).columns(), 1..3);
        assert_eq!(RegionOfInterest::from_indices(&g, 7..10).columns(), 3..3);
    }
}
