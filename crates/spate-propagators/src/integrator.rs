//! Explicit Euler stepping of the viscous Burgers' equation.
//!
//! Constructed via the builder pattern: [`StepIntegrator::builder`].

use spate_core::{FieldState, Shape};
use spate_space::{EdgeBehavior, Grid};

use crate::advection::AdvectionScheme;
use crate::error::PropagatorError;
use crate::grid_helpers::neighbour_table;

/// One explicit step of diffusion plus advection.
///
/// For every component `c` of the field, transported by `(u, v)`:
/// ```text
/// c_new = c + dt · (nu · (c_xx + c_yy) + advection(c))
/// ```
/// Every cell is updated, edges included. Out-of-range neighbours are
/// resolved per axis by [`EdgeBehavior`]; boundary policies overwrite the
/// edge cells afterwards unless the axis wraps.
///
/// A scalar field on a plane is transported by `u` along both axes.
///
/// All reads come from `prev`; the result is a fresh field, so no cell sees
/// a partially updated neighbour.
///
/// ```
/// use spate_core::FieldState;
/// use spate_propagators::{AdvectionScheme, StepIntegrator};
/// use spate_space::Grid;
///
/// let grid = Grid::line(1.0, 0.1).unwrap();
/// let stepper = StepIntegrator::builder()
///     .viscosity(0.1)
///     .scheme(AdvectionScheme::Central)
///     .build()
///     .unwrap();
/// let prev = FieldState::filled(grid.shape(), 0.5);
/// let next = stepper.advance(&prev, &grid, 0.01).unwrap();
/// assert_eq!(next.u(), prev.u());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StepIntegrator {
    viscosity: f64,
    scheme: AdvectionScheme,
    x_edge: EdgeBehavior,
    y_edge: EdgeBehavior,
}

/// Builder for [`StepIntegrator`].
///
/// Defaults: zero viscosity, upwind advection, clamped edges on both axes.
#[derive(Clone, Debug)]
pub struct StepIntegratorBuilder {
    viscosity: f64,
    scheme: AdvectionScheme,
    x_edge: EdgeBehavior,
    y_edge: EdgeBehavior,
}

impl StepIntegrator {
    /// Create a new builder.
    pub fn builder() -> StepIntegratorBuilder {
        StepIntegratorBuilder {
            viscosity: 0.0,
            scheme: AdvectionScheme::default(),
            x_edge: EdgeBehavior::Clamp,
            y_edge: EdgeBehavior::Clamp,
        }
    }

    /// Kinematic viscosity `nu`.
    pub fn viscosity(&self) -> f64 {
        self.viscosity
    }

    /// Advection discretisation.
    pub fn scheme(&self) -> AdvectionScheme {
        self.scheme
    }

    /// Edge behavior along x and y.
    pub fn edges(&self) -> (EdgeBehavior, EdgeBehavior) {
        (self.x_edge, self.y_edge)
    }

    /// Compute the unconstrained next state from `prev`.
    ///
    /// # Errors
    ///
    /// [`PropagatorError::ShapeMismatch`] if `prev` was not built on `grid`,
    /// [`PropagatorError::InvalidParameter`] for a non-positive `dt`.
    pub fn advance(
        &self,
        prev: &FieldState,
        grid: &Grid,
        dt: f64,
    ) -> Result<FieldState, PropagatorError> {
        if prev.shape() != grid.shape() {
            return Err(PropagatorError::ShapeMismatch {
                grid: grid.shape(),
                field: prev.shape(),
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PropagatorError::InvalidParameter {
                name: "dt",
                value: dt,
            });
        }

        let stencil = Stencil {
            shape: grid.shape(),
            dx: grid.dx(),
            dy: grid.dy(),
            x_nbrs: neighbour_table(grid.nx(), self.x_edge),
            y_nbrs: neighbour_table(grid.ny(), self.y_edge),
        };
        let u = prev.u();
        // Transport velocity along y: v when present, otherwise u.
        let ay = prev.v().unwrap_or(u);

        let mut next = prev.clone();
        let (u_out, v_out) = next.components_mut();
        self.update(&stencil, u, u, ay, dt, u_out);
        if let (Some(v_prev), Some(v_out)) = (prev.v(), v_out) {
            self.update(&stencil, v_prev, u, ay, dt, v_out);
        }
        Ok(next)
    }

    /// Write the stepped values of component `c` into `out`.
    fn update(
        &self,
        s: &Stencil,
        c: &[f64],
        ax: &[f64],
        ay: &[f64],
        dt: f64,
        out: &mut [f64],
    ) {
        let nx = s.shape.nx();
        let inv_dx2 = 1.0 / (s.dx * s.dx);
        for (j, &(jm, jp)) in s.y_nbrs.iter().enumerate() {
            for (i, &(im, ip)) in s.x_nbrs.iter().enumerate() {
                let k = j * nx + i;
                let here = c[k];
                let west = c[j * nx + im];
                let east = c[j * nx + ip];

                let mut lap = (east - 2.0 * here + west) * inv_dx2;
                let mut adv = self.scheme.term(ax[k], west, here, east, s.dx);

                if let Some(dy) = s.dy {
                    let south = c[jm * nx + i];
                    let north = c[jp * nx + i];
                    lap += (north - 2.0 * here + south) / (dy * dy);
                    adv += self.scheme.term(ay[k], south, here, north, dy);
                }

                out[k] = here + dt * (self.viscosity * lap + adv);
            }
        }
    }
}

/// Per-call geometry, resolved once.
struct Stencil {
    shape: Shape,
    dx: f64,
    dy: Option<f64>,
    x_nbrs: Vec<(usize, usize)>,
    y_nbrs: Vec<(usize, usize)>,
}

impl StepIntegratorBuilder {
    /// Set the kinematic viscosity (default 0.0). Must be finite and >= 0.
    pub fn viscosity(mut self, nu: f64) -> Self {
        self.viscosity = nu;
        self
    }

    /// Set the advection scheme (default upwind).
    pub fn scheme(mut self, scheme: AdvectionScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the edge behavior along x (default clamp).
    pub fn x_edge(mut self, edge: EdgeBehavior) -> Self {
        self.x_edge = edge;
        self
    }

    /// Set the edge behavior along y (default clamp). Ignored on a line.
    pub fn y_edge(mut self, edge: EdgeBehavior) -> Self {
        self.y_edge = edge;
        self
    }

    /// Build the integrator.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the viscosity is negative or not finite.
    pub fn build(self) -> Result<StepIntegrator, PropagatorError> {
        if !self.viscosity.is_finite() || self.viscosity < 0.0 {
            return Err(PropagatorError::InvalidParameter {
                name: "viscosity",
                value: self.viscosity,
            });
        }
        Ok(StepIntegrator {
            viscosity: self.viscosity,
            scheme: self.scheme,
            x_edge: self.x_edge,
            y_edge: self.y_edge,
        })
    }
}
