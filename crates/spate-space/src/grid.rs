//! Uniform Cartesian grids in one or two dimensions.

use std::ops::Range;

use spate_core::Shape;

use crate::edge::AxisId;
use crate::error::GridError;

/// Relative slack when mapping physical coordinates onto cell indices, so
/// that `x = i * h` computed in floating point still lands on cell `i`.
const COORD_EPS: f64 = 1e-9;

/// One discretised axis: extent `L`, spacing `h`, and `floor(L / h) + 1`
/// cells at coordinates `0, h, 2h, ...`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
    id: AxisId,
    extent: f64,
    spacing: f64,
    cells: usize,
}

impl Axis {
    /// Upper bound on cells per axis.
    pub const MAX_CELLS: usize = u32::MAX as usize;

    /// Discretise `extent` with step `spacing`.
    ///
    /// Returns `Err` if the spacing is not strictly positive, the extent is
    /// negative or not finite, or the extent is shorter than one cell.
    pub fn new(id: AxisId, extent: f64, spacing: f64) -> Result<Self, GridError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GridError::InvalidSpacing {
                axis: id,
                value: spacing,
            });
        }
        if !extent.is_finite() || extent < 0.0 {
            return Err(GridError::InvalidExtent {
                axis: id,
                value: extent,
            });
        }
        if extent < spacing {
            return Err(GridError::ExtentTooSmall {
                axis: id,
                extent,
                spacing,
            });
        }
        let intervals = (extent / spacing).floor();
        if intervals >= Self::MAX_CELLS as f64 {
            return Err(GridError::TooManyCells {
                axis: id,
                requested: intervals + 1.0,
            });
        }
        Ok(Self {
            id,
            extent,
            spacing,
            cells: intervals as usize + 1,
        })
    }

    /// Which axis this is.
    pub fn id(&self) -> AxisId {
        self.id
    }

    /// Physical extent.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Cell spacing.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Coordinate of cell `i`.
    pub fn coord(&self, i: usize) -> f64 {
        i as f64 * self.spacing
    }

    /// Nearest cell to coordinate `x`, or `None` if `x` lies off the axis.
    pub fn index_of(&self, x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let i = (x / self.spacing).round();
        if i < 0.0 || i >= self.cells as f64 {
            return None;
        }
        Some(i as usize)
    }

    /// Half-open index range of the cells whose coordinate lies in `[lo, hi]`.
    ///
    /// The result is clipped to the axis and is empty when `lo > hi` or the
    /// interval misses the axis entirely.
    pub fn cells_within(&self, lo: f64, hi: f64) -> Range<usize> {
        let n = self.cells as f64;
        let start = ((lo / self.spacing) - COORD_EPS).ceil().clamp(0.0, n) as usize;
        let end = (((hi / self.spacing) + COORD_EPS).floor() + 1.0).clamp(0.0, n) as usize;
        if lo > hi || end < start {
            return start..start;
        }
        start..end
    }
}

/// A rectangular domain discretised into uniformly spaced cells.
///
/// Immutable after construction. Cell `(i, j)` is column `i` (x) and row `j`
/// (y); a line grid has a single row.
///
/// # Examples
///
/// ```
/// use spate_space::Grid;
///
/// let line = Grid::line(28.0, 0.1).unwrap();
/// assert_eq!(line.nx(), 281);
/// assert_eq!(line.ndim(), 1);
///
/// let plane = Grid::plane(1.0, 0.25, 2.0, 0.5).unwrap();
/// assert_eq!((plane.nx(), plane.ny()), (5, 5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    x: Axis,
    y: Option<Axis>,
}

impl Grid {
    /// A 1D grid over `[0, length]` with spacing `dx`.
    pub fn line(length: f64, dx: f64) -> Result<Self, GridError> {
        Ok(Self {
            x: Axis::new(AxisId::X, length, dx)?,
            y: None,
        })
    }

    /// A 2D grid over `[0, length_x] × [0, length_y]`.
    pub fn plane(length_x: f64, dx: f64, length_y: f64, dy: f64) -> Result<Self, GridError> {
        Ok(Self {
            x: Axis::new(AxisId::X, length_x, dx)?,
            y: Some(Axis::new(AxisId::Y, length_y, dy)?),
        })
    }

    /// Number of spatial dimensions (1 or 2).
    pub fn ndim(&self) -> usize {
        if self.y.is_some() {
            2
        } else {
            1
        }
    }

    /// The x axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x
    }

    /// The y axis, for 2D grids.
    pub fn y_axis(&self) -> Option<&Axis> {
        self.y.as_ref()
    }

    /// Cells along x.
    pub fn nx(&self) -> usize {
        self.x.cells
    }

    /// Cells along y (1 for a line).
    pub fn ny(&self) -> usize {
        self.y.map_or(1, |a| a.cells)
    }

    /// Spacing along x.
    pub fn dx(&self) -> f64 {
        self.x.spacing
    }

    /// Spacing along y, for 2D grids.
    pub fn dy(&self) -> Option<f64> {
        self.y.map(|a| a.spacing)
    }

    /// Smallest spacing over all axes.
    pub fn min_spacing(&self) -> f64 {
        match self.y {
            Some(y) => self.x.spacing.min(y.spacing),
            None => self.x.spacing,
        }
    }

    /// Length (1D) or area (2D) of one cell.
    pub fn cell_measure(&self) -> f64 {
        self.x.spacing * self.y.map_or(1.0, |a| a.spacing)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Array shape of fields on this grid.
    pub fn shape(&self) -> Shape {
        match self.y {
            Some(y) => Shape::Plane {
                nx: self.x.cells,
                ny: y.cells,
            },
            None => Shape::Line { nx: self.x.cells },
        }
    }

    /// Physical coordinates of cell `(i, j)`. `y` is 0 on a line.
    pub fn coord(&self, i: usize, j: usize) -> (f64, f64) {
        (self.x.coord(i), self.y.map_or(0.0, |a| a.coord(j)))
    }

    /// Flat (row-major) index of cell `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx() + i
    }

    /// Column and row of a flat index.
    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index % self.nx(), index / self.nx())
    }
}
