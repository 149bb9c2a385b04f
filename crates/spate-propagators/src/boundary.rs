//! Boundary policies applied to the domain edges after each step.
//!
//! Every edge carries a [`BoundaryPolicy`] per velocity component. Policies
//! are applied in [`Edge::PLANE`] order (bottom, top, left, right), so on a
//! plane the side edges own the corner cells.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use spate_core::{Component, FieldState, Shape};
use spate_space::{AxisId, Edge, EdgeBehavior, Grid};

use crate::error::PropagatorError;

/// Time dependence of a source edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// `baseline`.
    #[default]
    Constant,
    /// `baseline + amplitude · |sin(2π f t)|`: rectified, never below baseline.
    Sinusoidal,
    /// `baseline + amplitude · sin(2π f t)`.
    SignedSinusoidal,
    /// `baseline + min(amplitude · min(1, t / total_time), ceiling)
    /// + ripple_amplitude · sin(2π f t)`.
    RampedSinusoidal {
        /// Largest value the ramped part reaches.
        ceiling: f64,
        /// Amplitude of the superimposed ripple.
        ripple_amplitude: f64,
        /// Time over which the ramp grows from 0 to full amplitude.
        total_time: f64,
    },
}

/// Time-varying edge value.
///
/// ```
/// use spate_propagators::{SourceForcing, SourceKind};
///
/// let pulse = SourceForcing {
///     kind: SourceKind::Sinusoidal,
///     amplitude: 0.3,
///     frequency: 0.8,
///     baseline: 0.01,
/// };
/// assert_eq!(pulse.value_at(0.0), 0.01);
/// assert!(pulse.value_at(0.9) >= 0.01);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceForcing {
    /// Waveform.
    #[serde(flatten)]
    pub kind: SourceKind,
    /// Peak amplitude above the baseline.
    pub amplitude: f64,
    /// Frequency in cycles per unit time.
    pub frequency: f64,
    /// Constant offset.
    pub baseline: f64,
}

impl Default for SourceForcing {
    fn default() -> Self {
        Self {
            kind: SourceKind::Constant,
            amplitude: 0.0,
            frequency: 0.0,
            baseline: 0.0,
        }
    }
}

impl SourceForcing {
    /// A source holding `baseline` forever.
    pub fn constant(baseline: f64) -> Self {
        Self {
            baseline,
            ..Self::default()
        }
    }

    /// Edge value at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        let phase = TAU * self.frequency * t;
        match self.kind {
            SourceKind::Constant => self.baseline,
            SourceKind::Sinusoidal => self.baseline + self.amplitude * phase.sin().abs(),
            SourceKind::SignedSinusoidal => self.baseline + self.amplitude * phase.sin(),
            SourceKind::RampedSinusoidal {
                ceiling,
                ripple_amplitude,
                total_time,
            } => {
                let growth = (t / total_time).min(1.0);
                let ramp = (self.amplitude * growth).min(ceiling);
                self.baseline + ramp + ripple_amplitude * phase.sin()
            }
        }
    }

    /// Largest value the source can produce, used to size the advective
    /// stability limit.
    pub fn max_value(&self) -> f64 {
        match self.kind {
            SourceKind::Constant => self.baseline.abs(),
            SourceKind::Sinusoidal | SourceKind::SignedSinusoidal => {
                self.baseline.abs() + self.amplitude.abs()
            }
            SourceKind::RampedSinusoidal {
                ceiling,
                ripple_amplitude,
                ..
            } => self.baseline.abs() + self.amplitude.min(ceiling).abs() + ripple_amplitude.abs(),
        }
    }

    /// Check that every parameter is finite and the ramp has a positive
    /// duration.
    pub fn validate(&self) -> Result<(), PropagatorError> {
        let finite = [
            ("source amplitude", self.amplitude),
            ("source frequency", self.frequency),
            ("source baseline", self.baseline),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(PropagatorError::InvalidParameter { name, value });
            }
        }
        if let SourceKind::RampedSinusoidal {
            ceiling,
            ripple_amplitude,
            total_time,
        } = self.kind
        {
            if !ceiling.is_finite() {
                return Err(PropagatorError::InvalidParameter {
                    name: "ramp ceiling",
                    value: ceiling,
                });
            }
            if !ripple_amplitude.is_finite() {
                return Err(PropagatorError::InvalidParameter {
                    name: "ripple amplitude",
                    value: ripple_amplitude,
                });
            }
            if !total_time.is_finite() || total_time <= 0.0 {
                return Err(PropagatorError::InvalidParameter {
                    name: "ramp total_time",
                    value: total_time,
                });
            }
        }
        Ok(())
    }
}

/// What an edge does to one component after each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Edge cells hold a constant.
    Fixed(f64),
    /// Edge cells copy their first interior neighbour (free outflow).
    #[default]
    ZeroGradient,
    /// The axis wraps; the stencil already reads across the seam, so
    /// nothing is written. Both edges of the axis must be periodic.
    Periodic,
    /// Edge cells follow a time-varying source.
    Source(SourceForcing),
}

impl BoundaryPolicy {
    /// Whether this is [`BoundaryPolicy::Periodic`].
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Periodic)
    }

    /// Overwrite the cells of `edge` in `data` for pre-step time `t`.
    ///
    /// Bottom and top do nothing on a line.
    pub fn apply(&self, data: &mut [f64], shape: Shape, edge: Edge, t: f64) {
        if edge.axis() == AxisId::Y && shape.ndim() == 1 {
            return;
        }
        let (nx, ny) = (shape.nx(), shape.ny());
        match *self {
            Self::Periodic => {}
            Self::Fixed(value) => fill_edge(data, nx, ny, edge, value),
            Self::Source(ref forcing) => fill_edge(data, nx, ny, edge, forcing.value_at(t)),
            Self::ZeroGradient => match edge {
                Edge::Left => {
                    for row in data.chunks_exact_mut(nx) {
                        row[0] = row[1];
                    }
                }
                Edge::Right => {
                    for row in data.chunks_exact_mut(nx) {
                        row[nx - 1] = row[nx - 2];
                    }
                }
                Edge::Bottom => {
                    let (edge_row, rest) = data.split_at_mut(nx);
                    edge_row.copy_from_slice(&rest[..nx]);
                }
                Edge::Top => {
                    let (rest, edge_row) = data.split_at_mut((ny - 1) * nx);
                    edge_row.copy_from_slice(&rest[(ny - 2) * nx..]);
                }
            },
        }
    }
}

fn fill_edge(data: &mut [f64], nx: usize, ny: usize, edge: Edge, value: f64) {
    match edge {
        Edge::Left => data.iter_mut().step_by(nx).for_each(|c| *c = value),
        Edge::Right => data
            .iter_mut()
            .skip(nx - 1)
            .step_by(nx)
            .for_each(|c| *c = value),
        Edge::Bottom => data[..nx].fill(value),
        Edge::Top => data[(ny - 1) * nx..].fill(value),
    }
}

/// Policies for the two components at one edge.
///
/// `v` falls back to `u`'s policy when unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeBoundary {
    /// Policy for `u`.
    pub u: BoundaryPolicy,
    /// Policy for `v`, if different from `u`'s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<BoundaryPolicy>,
}

impl EdgeBoundary {
    /// The same policy for both components.
    pub fn uniform(policy: BoundaryPolicy) -> Self {
        Self { u: policy, v: None }
    }

    /// Separate policies for `u` and `v`.
    pub fn split(u: BoundaryPolicy, v: BoundaryPolicy) -> Self {
        Self { u, v: Some(v) }
    }

    /// Policy for `component`.
    pub fn policy(&self, component: Component) -> &BoundaryPolicy {
        match component {
            Component::U => &self.u,
            Component::V => self.v.as_ref().unwrap_or(&self.u),
        }
    }

    fn periodicity(&self) -> (bool, bool) {
        (
            self.u.is_periodic(),
            self.policy(Component::V).is_periodic(),
        )
    }

    fn sources(&self) -> impl Iterator<Item = &SourceForcing> {
        [Some(&self.u), self.v.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|p| match p {
                BoundaryPolicy::Source(f) => Some(f),
                _ => None,
            })
    }
}

impl From<BoundaryPolicy> for EdgeBoundary {
    fn from(policy: BoundaryPolicy) -> Self {
        Self::uniform(policy)
    }
}

/// Policies bound to every edge of the domain.
///
/// A line only uses `left` and `right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConditions {
    /// Column 0.
    pub left: EdgeBoundary,
    /// Column `nx - 1`.
    pub right: EdgeBoundary,
    /// Row 0.
    pub bottom: EdgeBoundary,
    /// Row `ny - 1`.
    pub top: EdgeBoundary,
}

impl BoundaryConditions {
    /// The same policy on every edge and component.
    pub fn uniform(policy: BoundaryPolicy) -> Self {
        let e = EdgeBoundary::uniform(policy);
        Self {
            left: e,
            right: e,
            bottom: e,
            top: e,
        }
    }

    /// Policies at `edge`.
    pub fn edge(&self, edge: Edge) -> &EdgeBoundary {
        match edge {
            Edge::Left => &self.left,
            Edge::Right => &self.right,
            Edge::Bottom => &self.bottom,
            Edge::Top => &self.top,
        }
    }

    /// Edges that apply on `grid`, in application order.
    pub fn edges_for(grid: &Grid) -> &'static [Edge] {
        if grid.ndim() == 2 {
            &Edge::PLANE
        } else {
            &Edge::LINE
        }
    }

    /// Check the policies against `grid` and derive the stencil's edge
    /// behavior per axis: `Wrap` where both edges are periodic, else `Clamp`.
    ///
    /// # Errors
    ///
    /// [`PropagatorError::UnpairedPeriodic`] if an axis is periodic on only
    /// one edge or one component; [`PropagatorError::InvalidParameter`] for a
    /// malformed source or non-finite fixed value.
    pub fn edge_behavior(&self, grid: &Grid) -> Result<(EdgeBehavior, EdgeBehavior), PropagatorError> {
        for &edge in Self::edges_for(grid) {
            let e = self.edge(edge);
            for forcing in e.sources() {
                forcing.validate()?;
            }
            for policy in [&e.u, e.policy(Component::V)] {
                if let BoundaryPolicy::Fixed(value) = *policy {
                    if !value.is_finite() {
                        return Err(PropagatorError::InvalidParameter {
                            name: "fixed boundary value",
                            value,
                        });
                    }
                }
            }
        }
        let x = self.axis_behavior(AxisId::X, Edge::Left, Edge::Right)?;
        let y = if grid.ndim() == 2 {
            self.axis_behavior(AxisId::Y, Edge::Bottom, Edge::Top)?
        } else {
            EdgeBehavior::Clamp
        };
        Ok((x, y))
    }

    fn axis_behavior(&self, axis: AxisId, a: Edge, b: Edge) -> Result<EdgeBehavior, PropagatorError> {
        let (au, av) = self.edge(a).periodicity();
        let (bu, bv) = self.edge(b).periodicity();
        match (au, av, bu, bv) {
            (true, true, true, true) => Ok(EdgeBehavior::Wrap),
            (false, false, false, false) => Ok(EdgeBehavior::Clamp),
            _ => Err(PropagatorError::UnpairedPeriodic { axis }),
        }
    }

    /// Largest value any source edge on `grid` can impose.
    pub fn max_source_value(&self, grid: &Grid) -> f64 {
        Self::edges_for(grid)
            .iter()
            .flat_map(|&e| self.edge(e).sources())
            .map(SourceForcing::max_value)
            .fold(0.0, f64::max)
    }

    /// Apply every edge's policies to `state` for pre-step time `t`.
    ///
    /// # Errors
    ///
    /// [`PropagatorError::ShapeMismatch`] if `state` does not live on `grid`.
    pub fn apply(&self, state: &mut FieldState, grid: &Grid, t: f64) -> Result<(), PropagatorError> {
        let shape = grid.shape();
        if state.shape() != shape {
            return Err(PropagatorError::ShapeMismatch {
                grid: shape,
                field: state.shape(),
            });
        }
        for &edge in Self::edges_for(grid) {
            let e = self.edge(edge);
            let (u, v) = state.components_mut();
            e.policy(Component::U).apply(u, shape, edge, t);
            if let Some(v) = v {
                e.policy(Component::V).apply(v, shape, edge, t);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane() -> Grid {
        Grid::plane(3.0, 1.0, 2.0, 1.0).unwrap() // 4 x 3
    }

    fn ramp(p: f64) -> FieldState {
        let g = plane();
        let u: Vec<f64> = (0..g.cell_count()).map(|k| k as f64 * p).collect();
        FieldState::vector(g.shape(), u.clone(), u).unwrap()
    }

    #[test]
    fn rectified_sine_never_drops_below_baseline() {
        let s = SourceForcing {
            kind: SourceKind::Sinusoidal,
            amplitude: 0.3,
            frequency: 0.8,
            baseline: 0.01,
        };
        for n in 0..200 {
            assert!(s.value_at(n as f64 * 0.05) >= 0.01);
        }
        // Quarter period: full amplitude.
        assert!((s.value_at(0.3125) - 0.31).abs() < 1e-12);
    }

    #[test]
    fn signed_sine_goes_negative() {
        let s = SourceForcing {
            kind: SourceKind::SignedSinusoidal,
            amplitude: 0.2,
            frequency: 2.5,
            baseline: 1.1,
        };
        // Three quarter period: trough.
        assert!((s.value_at(0.3) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn ramp_saturates_at_ceiling() {
        let s = SourceForcing {
            kind: SourceKind::RampedSinusoidal {
                ceiling: 0.5,
                ripple_amplitude: 0.0,
                total_time: 1.0,
            },
            amplitude: 1.0,
            frequency: 1.0,
            baseline: 0.0,
        };
        assert_eq!(s.value_at(0.0), 0.0);
        assert!((s.value_at(0.25) - 0.25).abs() < 1e-12);
        assert_eq!(s.value_at(0.75), 0.5);
        assert_eq!(s.value_at(5.0), 0.5);
        assert_eq!(s.max_value(), 0.5);
    }

    #[test]
    fn ramp_needs_positive_duration() {
        let s = SourceForcing {
            kind: SourceKind::RampedSinusoidal {
                ceiling: 0.5,
                ripple_amplitude: 0.1,
                total_time: 0.0,
            },
            ..SourceForcing::default()
        };
        assert!(s.validate().is_err());
        assert!(SourceForcing::constant(1.0).validate().is_ok());
    }

    #[test]
    fn zero_gradient_copies_first_interior_neighbour() {
        let g = plane();
        let mut state = ramp(1.0);
        BoundaryConditions::default().apply(&mut state, &g, 0.0).unwrap();
        let u = state.u();
        for j in 0..3 {
            assert_eq!(u[g.index(0, j)], u[g.index(1, j)]);
            assert_eq!(u[g.index(3, j)], u[g.index(2, j)]);
        }
        for i in 1..3 {
            assert_eq!(u[g.index(i, 0)], u[g.index(i, 1)]);
            assert_eq!(u[g.index(i, 2)], u[g.index(i, 1)]);
        }
    }

    #[test]
    fn side_edges_own_the_corners() {
        let g = plane();
        let mut state = ramp(1.0);
        let bc = BoundaryConditions {
            left: BoundaryPolicy::Fixed(-1.0).into(),
            bottom: BoundaryPolicy::Fixed(7.0).into(),
            ..BoundaryConditions::default()
        };
        bc.apply(&mut state, &g, 0.0).unwrap();
        assert_eq!(state.u()[g.index(0, 0)], -1.0);
        assert_eq!(state.u()[g.index(1, 0)], 7.0);
    }

    #[test]
    fn components_take_separate_policies() {
        let g = plane();
        let mut state = ramp(1.0);
        let inflow = SourceForcing {
            kind: SourceKind::SignedSinusoidal,
            amplitude: 0.2,
            frequency: 2.5,
            baseline: 1.1,
        };
        let bc = BoundaryConditions {
            bottom: EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::Source(inflow)),
            left: EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::ZeroGradient),
            right: EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::ZeroGradient),
            ..BoundaryConditions::default()
        };
        bc.apply(&mut state, &g, 0.0).unwrap();
        let (u, v) = (state.u(), state.v().unwrap());
        assert_eq!(u[g.index(2, 0)], 0.0);
        assert!((v[g.index(2, 0)] - 1.1).abs() < 1e-12);
        assert_eq!(u[g.index(0, 1)], 0.0);
        assert_eq!(v[g.index(0, 1)], v[g.index(1, 1)]);
    }

    #[test]
    fn line_ignores_top_and_bottom() {
        let g = Grid::line(4.0, 1.0).unwrap();
        let mut state = FieldState::scalar(g.shape(), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let bc = BoundaryConditions {
            left: BoundaryPolicy::Fixed(9.0).into(),
            bottom: BoundaryPolicy::Fixed(-9.0).into(),
            ..BoundaryConditions::default()
        };
        bc.apply(&mut state, &g, 0.0).unwrap();
        assert_eq!(state.u(), &[9.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn periodic_axes_wrap() {
        let g = plane();
        let bc = BoundaryConditions {
            bottom: BoundaryPolicy::Periodic.into(),
            top: BoundaryPolicy::Periodic.into(),
            ..BoundaryConditions::default()
        };
        assert_eq!(
            bc.edge_behavior(&g).unwrap(),
            (EdgeBehavior::Clamp, EdgeBehavior::Wrap)
        );
        let before = ramp(0.5);
        let mut after = before.clone();
        bc.apply(&mut after, &g, 0.0).unwrap();
        // Only the left/right zero-gradient edges changed.
        for i in 1..3 {
            for j in 0..3 {
                assert_eq!(after.u()[g.index(i, j)], before.u()[g.index(i, j)]);
            }
        }
    }

    #[test]
    fn unpaired_periodic_is_rejected() {
        let g = plane();
        let one_side = BoundaryConditions {
            left: BoundaryPolicy::Periodic.into(),
            ..BoundaryConditions::default()
        };
        assert_eq!(
            one_side.edge_behavior(&g),
            Err(PropagatorError::UnpairedPeriodic { axis: AxisId::X })
        );
        let one_component = BoundaryConditions {
            bottom: EdgeBoundary::split(BoundaryPolicy::Periodic, BoundaryPolicy::ZeroGradient),
            top: BoundaryPolicy::Periodic.into(),
            ..BoundaryConditions::default()
        };
        assert!(one_component.edge_behavior(&g).is_err());
    }

    #[test]
    fn max_source_value_scans_active_edges() {
        let g = Grid::line(4.0, 1.0).unwrap();
        let bc = BoundaryConditions {
            left: BoundaryPolicy::Source(SourceForcing {
                kind: SourceKind::Sinusoidal,
                amplitude: 0.3,
                frequency: 0.8,
                baseline: 0.01,
            })
            .into(),
            top: BoundaryPolicy::Source(SourceForcing::constant(10.0)).into(),
            ..BoundaryConditions::default()
        };
        assert!((bc.max_source_value(&g) - 0.31).abs() < 1e-12);
    }
}
