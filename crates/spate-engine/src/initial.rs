//! Initial conditions.

use serde::{Deserialize, Serialize};
use spate_core::FieldState;
use spate_space::Grid;

use crate::config::ConfigError;

/// Seed values for one component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialCondition {
    /// Every cell holds the same value.
    Flat(f64),
    /// `baseline + amplitude · exp(-((x - center) / width)²)`, varying along x
    /// only.
    GaussianPulse {
        /// Physical x-coordinate of the crest.
        center: f64,
        /// e-folding half-width.
        width: f64,
        /// Crest height above the baseline.
        amplitude: f64,
        /// Value far from the crest.
        baseline: f64,
    },
    /// Explicit row-major values, one per cell.
    Field(Vec<f64>),
}

impl Default for InitialCondition {
    fn default() -> Self {
        Self::Flat(0.0)
    }
}

impl InitialCondition {
    /// Cell values on `grid`.
    ///
    /// # Errors
    ///
    /// Non-finite parameters, a non-positive pulse width, or an explicit
    /// field of the wrong length.
    pub fn values(&self, grid: &Grid) -> Result<Vec<f64>, ConfigError> {
        match self {
            Self::Flat(value) => {
                finite("initial value", *value)?;
                Ok(vec![*value; grid.cell_count()])
            }
            Self::GaussianPulse {
                center,
                width,
                amplitude,
                baseline,
            } => {
                finite("pulse center", *center)?;
                finite("pulse amplitude", *amplitude)?;
                finite("pulse baseline", *baseline)?;
                if !width.is_finite() || *width <= 0.0 {
                    return Err(ConfigError::InvalidParameter {
                        name: "pulse width",
                        value: *width,
                    });
                }
                let row: Vec<f64> = (0..grid.nx())
                    .map(|i| {
                        let z = (grid.x_axis().coord(i) - center) / width;
                        baseline + amplitude * (-z * z).exp()
                    })
                    .collect();
                Ok(row.repeat(grid.ny()))
            }
            Self::Field(values) => {
                if values.len() != grid.cell_count() {
                    return Err(ConfigError::InitialLength {
                        expected: grid.cell_count(),
                        actual: values.len(),
                    });
                }
                if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(ConfigError::InvalidParameter {
                        name: "initial field value",
                        value: bad,
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

/// Seed for the whole field: `u`, and `v` for a two-component run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    /// Primary component.
    pub u: InitialCondition,
    /// Secondary component. Absent for a scalar run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<InitialCondition>,
}

impl InitialState {
    /// A scalar seed.
    pub fn scalar(u: InitialCondition) -> Self {
        Self { u, v: None }
    }

    /// A two-component seed.
    pub fn vector(u: InitialCondition, v: InitialCondition) -> Self {
        Self { u, v: Some(v) }
    }

    /// Build the field at step 0.
    ///
    /// # Errors
    ///
    /// Anything [`InitialCondition::values`] rejects, or a `v` component on
    /// a 1D grid.
    pub fn seed(&self, grid: &Grid) -> Result<FieldState, ConfigError> {
        let u = self.u.values(grid)?;
        let state = match &self.v {
            None => FieldState::scalar(grid.shape(), u)?,
            Some(v) => {
                if grid.ndim() != 2 {
                    return Err(ConfigError::DimensionMismatch {
                        reason: "a v component needs a 2D domain".into(),
                    });
                }
                FieldState::vector(grid.shape(), u, v.values(grid)?)?
            }
        };
        Ok(state)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(())
}
