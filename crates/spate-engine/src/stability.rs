//! Time-step stability limits for the explicit scheme.

use std::fmt;

use spate_space::Grid;

/// Diffusive and advective step limits for one grid, viscosity and speed.
///
/// ```text
/// diffusive = h² / (4 nu)
/// advective = h / max(speed, ε)
/// ```
/// with `h` the smallest grid spacing. With `nu = 0` the diffusive limit is
/// unbounded.
///
/// ```
/// use spate_engine::StabilityAdvisor;
/// use spate_space::Grid;
///
/// let grid = Grid::line(28.0, 0.1).unwrap();
/// let advisor = StabilityAdvisor::new(&grid, 0.1, 1.0);
/// assert!((advisor.diffusive_limit() - 0.025).abs() < 1e-12);
/// assert!(advisor.recommend(0.01).stable);
/// assert!(!advisor.recommend(0.05).stable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityAdvisor {
    min_spacing: f64,
    viscosity: f64,
    speed: f64,
}

impl StabilityAdvisor {
    /// Floor on the characteristic speed in the advective limit.
    pub const SPEED_FLOOR: f64 = 1e-6;

    /// Advisor for `grid`, viscosity `nu` and characteristic speed `speed`.
    pub fn new(grid: &Grid, viscosity: f64, speed: f64) -> Self {
        Self {
            min_spacing: grid.min_spacing(),
            viscosity,
            speed: speed.abs(),
        }
    }

    /// Largest stable `dt` for diffusion.
    pub fn diffusive_limit(&self) -> f64 {
        if self.viscosity <= 0.0 {
            return f64::INFINITY;
        }
        self.min_spacing * self.min_spacing / (4.0 * self.viscosity)
    }

    /// Largest stable `dt` for advection.
    pub fn advective_limit(&self) -> f64 {
        self.min_spacing / self.speed.max(Self::SPEED_FLOOR)
    }

    /// Check a candidate `dt` against both limits.
    pub fn recommend(&self, dt: f64) -> StabilityReport {
        let diffusive_limit = self.diffusive_limit();
        let advective_limit = self.advective_limit();
        StabilityReport {
            dt,
            stable: dt <= diffusive_limit && dt <= advective_limit,
            diffusive_limit,
            advective_limit,
        }
    }
}

/// Outcome of [`StabilityAdvisor::recommend`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityReport {
    /// The candidate step.
    pub dt: f64,
    /// Whether `dt` is within both limits.
    pub stable: bool,
    /// `h² / (4 nu)`.
    pub diffusive_limit: f64,
    /// `h / max(speed, ε)`.
    pub advective_limit: f64,
}

impl StabilityReport {
    /// The tighter of the two limits.
    pub fn limit(&self) -> f64 {
        self.diffusive_limit.min(self.advective_limit)
    }

    /// Name of the tighter limit.
    pub fn binding(&self) -> &'static str {
        if self.diffusive_limit <= self.advective_limit {
            "diffusive"
        } else {
            "advective"
        }
    }
}

impl fmt::Display for StabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dt = {} vs diffusive limit {:.3e}, advective limit {:.3e} ({})",
            self.dt,
            self.diffusive_limit,
            self.advective_limit,
            if self.stable { "stable" } else { "unstable" }
        )
    }
}
