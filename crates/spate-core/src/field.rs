//! Field state: the solution arrays at one simulated instant.
//!
//! A [`FieldState`] holds the primary component `u` and, for the 2D vector
//! case, a second component `v`. Arrays are stored row-major: cell `(i, j)`
//! (column `i`, row `j`) lives at flat index `j * nx + i`.

use std::fmt;
use std::ops::Range;

use smallvec::{smallvec, SmallVec};

use crate::error::FieldError;

/// Array shape of a field, matching the grid that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// One-dimensional: `nx` cells.
    Line {
        /// Cells along x.
        nx: usize,
    },
    /// Two-dimensional: `ny` rows of `nx` cells.
    Plane {
        /// Cells along x (columns).
        nx: usize,
        /// Cells along y (rows).
        ny: usize,
    },
}

impl Shape {
    /// Cells along x.
    pub fn nx(&self) -> usize {
        match *self {
            Self::Line { nx } | Self::Plane { nx, .. } => nx,
        }
    }

    /// Cells along y. A line has a single row.
    pub fn ny(&self) -> usize {
        match *self {
            Self::Line { .. } => 1,
            Self::Plane { ny, .. } => ny,
        }
    }

    /// Number of spatial dimensions (1 or 2).
    pub fn ndim(&self) -> usize {
        match self {
            Self::Line { .. } => 1,
            Self::Plane { .. } => 2,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Array dimensions in row-major order: `[nx]` or `[ny, nx]`.
    pub fn dims(&self) -> SmallVec<[usize; 2]> {
        match *self {
            Self::Line { nx } => smallvec![nx],
            Self::Plane { nx, ny } => smallvec![ny, nx],
        }
    }

    /// Flat index of column `i`, row `j`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx() + i
    }
}

/// One of the two velocity components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// Primary component (x-velocity, or the scalar in 1D).
    U,
    /// Secondary component (y-velocity), 2D vector case only.
    V,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U => write!(f, "u"),
            Self::V => write!(f, "v"),
        }
    }
}

/// Solution arrays at one instant.
///
/// Every component always has exactly `shape.cell_count()` values; the
/// constructors reject anything else and no method changes the length.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldState {
    shape: Shape,
    u: Vec<f64>,
    v: Option<Vec<f64>>,
}

impl FieldState {
    /// A scalar field (`u` only).
    pub fn scalar(shape: Shape, u: Vec<f64>) -> Result<Self, FieldError> {
        check_len(shape, Component::U, &u)?;
        Ok(Self { shape, u, v: None })
    }

    /// A two-component field (`u` and `v`).
    pub fn vector(shape: Shape, u: Vec<f64>, v: Vec<f64>) -> Result<Self, FieldError> {
        check_len(shape, Component::U, &u)?;
        check_len(shape, Component::V, &v)?;
        Ok(Self {
            shape,
            u,
            v: Some(v),
        })
    }

    /// A scalar field with every cell set to `value`.
    pub fn filled(shape: Shape, value: f64) -> Self {
        Self {
            shape,
            u: vec![value; shape.cell_count()],
            v: None,
        }
    }

    /// Array shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether the field carries a `v` component.
    pub fn is_vector(&self) -> bool {
        self.v.is_some()
    }

    /// The `u` component.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// The `v` component, if present.
    pub fn v(&self) -> Option<&[f64]> {
        self.v.as_deref()
    }

    /// Mutable `u` component.
    pub fn u_mut(&mut self) -> &mut [f64] {
        &mut self.u
    }

    /// Mutable `v` component, if present.
    pub fn v_mut(&mut self) -> Option<&mut [f64]> {
        self.v.as_deref_mut()
    }

    /// Look up a component by tag.
    pub fn component(&self, component: Component) -> Option<&[f64]> {
        match component {
            Component::U => Some(&self.u),
            Component::V => self.v.as_deref(),
        }
    }

    /// Mutable lookup of a component by tag.
    pub fn component_mut(&mut self, component: Component) -> Option<&mut [f64]> {
        match component {
            Component::U => Some(&mut self.u),
            Component::V => self.v.as_deref_mut(),
        }
    }

    /// Both components mutably at once.
    pub fn components_mut(&mut self) -> (&mut [f64], Option<&mut [f64]>) {
        (&mut self.u, self.v.as_deref_mut())
    }

    /// First NaN or infinite value, scanning `u` then `v`.
    pub fn first_non_finite(&self) -> Option<(Component, usize, f64)> {
        let scan = |c: Component, data: &[f64]| {
            data.iter()
                .position(|x| !x.is_finite())
                .map(|i| (c, i, data[i]))
        };
        scan(Component::U, &self.u).or_else(|| {
            self.v
                .as_deref()
                .and_then(|v| scan(Component::V, v))
        })
    }

    /// Largest `u` value.
    pub fn peak(&self) -> f64 {
        self.u.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest `u` value.
    pub fn min(&self) -> f64 {
        self.u.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest absolute value over all components.
    pub fn max_abs(&self) -> f64 {
        let u_max = self.u.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        match &self.v {
            Some(v) => v.iter().fold(u_max, |m, x| m.max(x.abs())),
            None => u_max,
        }
    }

    /// Per-cell speed `sqrt(u² + v²)`, or `|u|` for a scalar field.
    pub fn speed(&self) -> Vec<f64> {
        match &self.v {
            Some(v) => self
                .u
                .iter()
                .zip(v)
                .map(|(a, b)| (a * a + b * b).sqrt())
                .collect(),
            None => self.u.iter().map(|a| a.abs()).collect(),
        }
    }

    /// Integrated `u` over columns `cols` of every row: `Σ u · cell_measure`.
    ///
    /// For a line this is `Σ u[a..b] · dx`. Columns past `nx` are ignored.
    pub fn integrate(&self, cols: Range<usize>, cell_measure: f64) -> f64 {
        let nx = self.shape.nx();
        let start = cols.start.min(nx);
        let end = cols.end.min(nx);
        if start >= end {
            return 0.0;
        }
        let total: f64 = self
            .u
            .chunks_exact(nx)
            .map(|row| row[start..end].iter().sum::<f64>())
            .sum();
        total * cell_measure
    }
}

fn check_len(shape: Shape, component: Component, data: &[f64]) -> Result<(), FieldError> {
    let expected = shape.cell_count();
    if data.len() != expected {
        return Err(FieldError::LengthMismatch {
            component,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shape_dims_are_row_major() {
        assert_eq!(Shape::Line { nx: 7 }.dims().as_slice(), &[7]);
        assert_eq!(Shape::Plane { nx: 4, ny: 3 }.dims().as_slice(), &[3, 4]);
        assert_eq!(Shape::Plane { nx: 4, ny: 3 }.cell_count(), 12);
        assert_eq!(Shape::Line { nx: 7 }.ny(), 1);
    }

    #[test]
    fn scalar_rejects_wrong_length() {
        let err = FieldState::scalar(Shape::Line { nx: 5 }, vec![0.0; 4]).unwrap_err();
        assert_eq!(
            err,
            FieldError::LengthMismatch {
                component: Component::U,
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn vector_rejects_wrong_v_length() {
        let shape = Shape::Plane { nx: 2, ny: 2 };
        let err = FieldState::vector(shape, vec![0.0; 4], vec![0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            FieldError::LengthMismatch {
                component: Component::V,
                ..
            }
        ));
    }

    #[test]
    fn first_non_finite_scans_u_before_v() {
        let shape = Shape::Line { nx: 3 };
        let mut state = FieldState::vector(shape, vec![1.0; 3], vec![1.0; 3]).unwrap();
        assert!(state.first_non_finite().is_none());

        state.v_mut().unwrap()[0] = f64::INFINITY;
        state.u_mut()[2] = f64::NAN;
        let (c, i, _) = state.first_non_finite().unwrap();
        assert_eq!((c, i), (Component::U, 2));
    }

    #[test]
    fn integrate_line_range() {
        let state = FieldState::scalar(Shape::Line { nx: 5 }, vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap();
        assert!((state.integrate(1..4, 0.5) - 4.5).abs() < 1e-12);
        assert_eq!(state.integrate(3..3, 0.5), 0.0);
        // Out-of-range end is clipped.
        assert!((state.integrate(3..99, 1.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn integrate_plane_sums_every_row() {
        let shape = Shape::Plane { nx: 3, ny: 2 };
        let state = FieldState::scalar(shape, vec![1.0, 2.0, 3.0, 10.0, 20.0, 30.0]).unwrap();
        // Columns 1..3 of both rows: 2+3+20+30 = 55
        assert!((state.integrate(1..3, 0.25) - 13.75).abs() < 1e-12);
    }

    #[test]
    fn speed_is_vector_magnitude() {
        let shape = Shape::Line { nx: 2 };
        let state = FieldState::vector(shape, vec![3.0, 0.0], vec![4.0, -2.0]).unwrap();
        assert_eq!(state.speed(), vec![5.0, 2.0]);
        assert_eq!(state.max_abs(), 4.0);
    }

    proptest! {
        #[test]
        fn filled_field_integral_is_value_times_area(
            nx in 1usize..40,
            ny in 1usize..10,
            value in -5.0f64..5.0,
            measure in 0.01f64..1.0,
        ) {
            let state = FieldState::filled(Shape::Plane { nx, ny }, value);
            let expected = value * (nx * ny) as f64 * measure;
            prop_assert!((state.integrate(0..nx, measure) - expected).abs() < 1e-9);
            prop_assert_eq!(state.u().len(), nx * ny);
        }
    }
}
