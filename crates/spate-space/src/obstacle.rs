//! Solid obstacles rasterised onto the grid.
//!
//! An [`ObstacleSpec`] describes one body in cell units; an [`ObstacleMask`]
//! is the boolean field of solid cells it covers. Masks over the same grid
//! combine by union, so clusters of bodies are built one spec at a time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spate_core::{FieldState, Shape};

use crate::error::ShapeError;
use crate::grid::Grid;

/// Obstacle geometry, with sizes in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleShape {
    /// No body. Rasterises to an empty mask.
    None,
    /// Axis-aligned square covering `[c - half_size, c + half_size)` on both axes.
    Square {
        /// Half the side length.
        half_size: usize,
    },
    /// Axis-aligned box with independent half-extents.
    Rectangle {
        /// Half-extent along x.
        half_width: usize,
        /// Half-extent along y.
        half_height: usize,
    },
    /// Isosceles triangle pointing up: base row `base_offset` rows from the
    /// centre row, apex `height` rows above the base. Rows outside the grid
    /// are skipped.
    Triangle {
        /// Half-width of the base row.
        half_base: usize,
        /// Rows from base to apex.
        height: usize,
        /// Signed row offset of the base from the centre. Negative puts the
        /// base below the centre, possibly below row 0.
        #[serde(default, skip_serializing_if = "is_zero")]
        base_offset: isize,
    },
    /// Disc of cells within Euclidean distance `radius` of the centre.
    Circle {
        /// Radius in cells.
        radius: usize,
    },
}

fn is_zero(v: &isize) -> bool {
    *v == 0
}

impl ObstacleShape {
    /// Tag of this shape.
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Self::None => ObstacleKind::None,
            Self::Square { .. } => ObstacleKind::Square,
            Self::Rectangle { .. } => ObstacleKind::Rectangle,
            Self::Triangle { .. } => ObstacleKind::Triangle,
            Self::Circle { .. } => ObstacleKind::Circle,
        }
    }
}

/// Shape tag without size parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// No body.
    #[default]
    None,
    /// Square.
    Square,
    /// Rectangle (taller than wide).
    Rectangle,
    /// Upward-pointing triangle.
    Triangle,
    /// Circle.
    Circle,
}

impl ObstacleKind {
    /// Every kind, in menu order.
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Square,
        ObstacleKind::Circle,
        ObstacleKind::Rectangle,
        ObstacleKind::Triangle,
        ObstacleKind::None,
    ];

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Circle => "circle",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObstacleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| {
                format!("unknown obstacle kind '{s}' (expected square, circle, rectangle, triangle or none)")
            })
    }
}

/// One obstacle: a shape placed at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Geometry.
    #[serde(flatten)]
    pub shape: ObstacleShape,
    /// `[column, row]` of the reference cell.
    #[serde(default)]
    pub center: [usize; 2],
}

impl ObstacleSpec {
    /// A spec with no body.
    pub const NONE: ObstacleSpec = ObstacleSpec {
        shape: ObstacleShape::None,
        center: [0, 0],
    };

    /// Size a shape as a fraction `p` of the grid.
    ///
    /// Square half-size and circle radius are `⌊ny·p⌋`; a rectangle is
    /// `⌊ny·1.5p⌋` tall by `⌊nx·0.5p⌋` wide (half-extents); a triangle is
    /// `⌊2·ny·p⌋` high with half-base `⌊nx·p⌋`, and `center` names the middle
    /// of its height rather than its base. The spec is normalised so that
    /// `center` is the base row whenever that row is on the grid; otherwise
    /// `center` is row 0 and the base sits `base_offset` rows below it.
    pub fn from_fraction(
        kind: ObstacleKind,
        center: [usize; 2],
        fraction: f64,
        grid: &Grid,
    ) -> Result<Self, ShapeError> {
        if kind == ObstacleKind::None {
            return Ok(Self::NONE);
        }
        if grid.ndim() != 2 {
            return Err(ShapeError::RequiresPlane {
                kind: kind.as_str(),
            });
        }
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(ShapeError::NonPositiveSize {
                kind: kind.as_str(),
                parameter: "fraction",
            });
        }
        let nx = grid.nx() as f64;
        let ny = grid.ny() as f64;
        let cells = |x: f64| x.floor() as usize;
        let (shape, center) = match kind {
            ObstacleKind::None => return Ok(Self::NONE),
            ObstacleKind::Square => (
                ObstacleShape::Square {
                    half_size: cells(ny * fraction),
                },
                center,
            ),
            ObstacleKind::Rectangle => (
                ObstacleShape::Rectangle {
                    half_width: cells(nx * fraction * 0.5),
                    half_height: cells(ny * fraction * 1.5),
                },
                center,
            ),
            ObstacleKind::Circle => (
                ObstacleShape::Circle {
                    radius: cells(ny * fraction),
                },
                center,
            ),
            ObstacleKind::Triangle => {
                let height = cells(ny * fraction * 2.0);
                let base = center[1] as isize - (height / 2) as isize;
                (
                    ObstacleShape::Triangle {
                        half_base: cells(nx * fraction),
                        height,
                        base_offset: base.min(0),
                    },
                    [center[0], base.max(0) as usize],
                )
            }
        };
        Ok(Self { shape, center })
    }
}

/// Placement of one or more bodies of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleLayout {
    /// One body in the middle of the domain.
    #[default]
    Single,
    /// Two bodies side by side at a quarter and three quarters of the width.
    Pair,
    /// Two bodies upstream of centre and one downstream, in a triangle.
    Trio,
}

impl ObstacleLayout {
    /// Every layout.
    pub const ALL: [ObstacleLayout; 3] = [Self::Single, Self::Pair, Self::Trio];

    /// Size fraction used for each body.
    pub fn fraction(&self) -> f64 {
        match self {
            Self::Single => 0.1,
            Self::Pair | Self::Trio => 0.08,
        }
    }

    /// Specs for every body in the layout.
    pub fn specs(&self, kind: ObstacleKind, grid: &Grid) -> Result<Vec<ObstacleSpec>, ShapeError> {
        let nx = grid.nx();
        let ny = grid.ny();
        let mid = ny / 2;
        let centers: Vec<[usize; 2]> = match self {
            Self::Single => vec![[nx / 2, mid]],
            Self::Pair => vec![[nx / 4, mid], [3 * nx / 4, mid]],
            Self::Trio => {
                let upper = mid + ny / 10;
                let lower = mid - ny / 10;
                vec![[nx / 4, upper], [3 * nx / 4, upper], [nx / 2, lower]]
            }
        };
        centers
            .into_iter()
            .map(|c| ObstacleSpec::from_fraction(kind, c, self.fraction(), grid))
            .collect()
    }

    /// Union mask of every body in the layout.
    pub fn mask(&self, kind: ObstacleKind, grid: &Grid) -> Result<ObstacleMask, ShapeError> {
        ObstacleMask::build_all(&self.specs(kind, grid)?, grid)
    }
}

impl fmt::Display for ObstacleLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Pair => "pair",
            Self::Trio => "trio",
        })
    }
}

impl FromStr for ObstacleLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.to_string() == lower)
            .ok_or_else(|| format!("unknown layout '{s}' (expected single, pair or trio)"))
    }
}

/// Half-width of a triangle row `rows_above_base` rows above the base.
///
/// Linear from `half_base` at the base to 0 at the apex, truncated to whole
/// cells.
///
/// ```
/// use spate_space::triangle_half_width;
///
/// assert_eq!(triangle_half_width(5, 10, 0), 5);
/// assert_eq!(triangle_half_width(5, 10, 10), 0);
/// ```
pub fn triangle_half_width(half_base: usize, height: usize, rows_above_base: usize) -> usize {
    if height == 0 || rows_above_base >= height {
        return 0;
    }
    half_base * (height - rows_above_base) / height
}

/// Boolean field of solid cells, row-major like [`FieldState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMask {
    shape: Shape,
    cells: Vec<bool>,
}

impl ObstacleMask {
    /// A mask with no solid cells.
    pub fn empty(shape: Shape) -> Self {
        Self {
            shape,
            cells: vec![false; shape.cell_count()],
        }
    }

    /// Rasterise one obstacle onto `grid`.
    ///
    /// # Errors
    ///
    /// [`ShapeError::NonPositiveSize`] for a zero size, [`ShapeError::OutOfGrid`]
    /// if the body does not fit, [`ShapeError::RequiresPlane`] for a body on
    /// a 1D grid.
    pub fn build(spec: &ObstacleSpec, grid: &Grid) -> Result<Self, ShapeError> {
        let mut mask = Self::empty(grid.shape());
        let kind = spec.shape.kind().as_str();
        if spec.shape == ObstacleShape::None {
            return Ok(mask);
        }
        if grid.ndim() != 2 {
            return Err(ShapeError::RequiresPlane { kind });
        }
        let (nx, ny) = (grid.nx(), grid.ny());
        let [cx, cy] = spec.center;
        if cx >= nx || cy >= ny {
            return Err(ShapeError::OutOfGrid {
                kind,
                reason: format!("centre ({cx}, {cy}) not in {nx}x{ny} grid"),
            });
        }

        match spec.shape {
            ObstacleShape::None => {}
            ObstacleShape::Square { half_size } => {
                positive(kind, "half_size", half_size)?;
                let cols = span(kind, "x", cx, half_size, nx)?;
                let rows = span(kind, "y", cy, half_size, ny)?;
                mask.fill_box(cols, rows);
            }
            ObstacleShape::Rectangle {
                half_width,
                half_height,
            } => {
                positive(kind, "half_width", half_width)?;
                positive(kind, "half_height", half_height)?;
                let cols = span(kind, "x", cx, half_width, nx)?;
                let rows = span(kind, "y", cy, half_height, ny)?;
                mask.fill_box(cols, rows);
            }
            ObstacleShape::Circle { radius } => {
                positive(kind, "radius", radius)?;
                if cx < radius || cx + radius >= nx || cy < radius || cy + radius >= ny {
                    return Err(ShapeError::OutOfGrid {
                        kind,
                        reason: format!("radius {radius} around ({cx}, {cy}) leaves the grid"),
                    });
                }
                let r2 = (radius * radius) as f64;
                for j in cy - radius..=cy + radius {
                    for i in cx - radius..=cx + radius {
                        let di = i as f64 - cx as f64;
                        let dj = j as f64 - cy as f64;
                        if di * di + dj * dj <= r2 {
                            mask.cells[j * nx + i] = true;
                        }
                    }
                }
            }
            ObstacleShape::Triangle {
                half_base,
                height,
                base_offset,
            } => {
                positive(kind, "half_base", half_base)?;
                positive(kind, "height", height)?;
                let base = cy as isize + base_offset;
                // Rows off the grid are skipped; columns are clipped.
                for offset in 0..height {
                    let Ok(j) = usize::try_from(base + offset as isize) else {
                        continue;
                    };
                    if j >= ny {
                        break;
                    }
                    let hw = triangle_half_width(half_base, height, offset);
                    let start = cx.saturating_sub(hw);
                    let end = (cx + hw + 1).min(nx);
                    mask.cells[j * nx + start..j * nx + end].fill(true);
                }
            }
        }
        Ok(mask)
    }

    /// Union of every spec's mask. An empty slice gives an empty mask.
    pub fn build_all(specs: &[ObstacleSpec], grid: &Grid) -> Result<Self, ShapeError> {
        specs.iter().try_fold(Self::empty(grid.shape()), |acc, spec| {
            acc.union(&Self::build(spec, grid)?)
        })
    }

    /// Cell-wise OR of two masks over the same shape.
    pub fn union(&self, other: &Self) -> Result<Self, ShapeError> {
        if self.shape != other.shape {
            return Err(ShapeError::ShapeMismatch {
                left: self.shape,
                right: other.shape,
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| *a || *b)
            .collect();
        Ok(Self {
            shape: self.shape,
            cells,
        })
    }

    /// Array shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Row-major solid flags.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Whether cell `(i, j)` is solid. Out-of-range cells are not.
    pub fn is_solid(&self, i: usize, j: usize) -> bool {
        if i >= self.shape.nx() || j >= self.shape.ny() {
            return false;
        }
        self.cells[self.shape.index(i, j)]
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Whether no cell is solid.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|c| *c)
    }

    /// Force every component to zero on solid cells (no-slip).
    ///
    /// A mask whose shape differs from the field's is rejected.
    pub fn apply(&self, state: &mut FieldState) -> Result<(), ShapeError> {
        if state.shape() != self.shape {
            return Err(ShapeError::ShapeMismatch {
                left: self.shape,
                right: state.shape(),
            });
        }
        let (u, mut v) = state.components_mut();
        for (idx, _) in self.cells.iter().enumerate().filter(|(_, c)| **c) {
            u[idx] = 0.0;
            if let Some(v) = v.as_deref_mut() {
                v[idx] = 0.0;
            }
        }
        Ok(())
    }

    fn fill_box(&mut self, cols: std::ops::Range<usize>, rows: std::ops::Range<usize>) {
        let nx = self.shape.nx();
        for j in rows {
            self.cells[j * nx + cols.start..j * nx + cols.end].fill(true);
        }
    }
}

fn positive(kind: &'static str, parameter: &'static str, value: usize) -> Result<(), ShapeError> {
    if value == 0 {
        return Err(ShapeError::NonPositiveSize { kind, parameter });
    }
    Ok(())
}

/// `[c - half, c + half)`, or `OutOfGrid` if it leaves `[0, n)`.
fn span(
    kind: &'static str,
    axis: &str,
    c: usize,
    half: usize,
    n: usize,
) -> Result<std::ops::Range<usize>, ShapeError> {
    if c < half || c + half > n {
        return Err(ShapeError::OutOfGrid {
            kind,
            reason: format!("{axis} extent {c}±{half} leaves [0, {n})"),
        });
    }
    Ok(c - half..c + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn river() -> Grid {
        Grid::plane(1.0, 0.01, 2.0, 0.02).unwrap()
    }

    fn spec(shape: ObstacleShape, cx: usize, cy: usize) -> ObstacleSpec {
        ObstacleSpec {
            shape,
            center: [cx, cy],
        }
    }

    #[test]
    fn triangle_half_width_endpoints() {
        assert_eq!(triangle_half_width(5, 10, 0), 5);
        assert_eq!(triangle_half_width(5, 10, 10), 0);
        assert_eq!(triangle_half_width(5, 10, 5), 2);
        assert_eq!(triangle_half_width(5, 10, 9), 0);
        assert_eq!(triangle_half_width(5, 0, 0), 0);
    }

    #[test]
    fn square_fills_half_open_box() {
        let g = Grid::plane(1.0, 0.1, 1.0, 0.1).unwrap(); // 11x11
        let m = ObstacleMask::build(&spec(ObstacleShape::Square { half_size: 2 }, 5, 5), &g)
            .unwrap();
        assert_eq!(m.solid_count(), 16);
        assert!(m.is_solid(3, 3));
        assert!(m.is_solid(6, 6));
        assert!(!m.is_solid(7, 5));
        assert!(!m.is_solid(5, 2));
    }

    #[test]
    fn rectangle_uses_independent_extents() {
        let g = river();
        let m = ObstacleMask::build(
            &spec(
                ObstacleShape::Rectangle {
                    half_width: 2,
                    half_height: 5,
                },
                50,
                50,
            ),
            &g,
        )
        .unwrap();
        assert_eq!(m.solid_count(), 4 * 10);
    }

    #[test]
    fn circle_contains_centre_and_excludes_corners() {
        let g = river();
        let m =
            ObstacleMask::build(&spec(ObstacleShape::Circle { radius: 10 }, 50, 50), &g).unwrap();
        assert!(m.is_solid(50, 50));
        assert!(m.is_solid(60, 50));
        assert!(m.is_solid(50, 40));
        assert!(!m.is_solid(58, 58));
        assert!(!m.is_solid(61, 50));
    }

    #[test]
    fn triangle_narrows_towards_apex() {
        let g = river();
        let m = ObstacleMask::build(
            &spec(
                ObstacleShape::Triangle {
                    half_base: 5,
                    height: 10,
                    base_offset: 0,
                },
                50,
                20,
            ),
            &g,
        )
        .unwrap();
        // Base row: 11 cells; row 9 above base is 1 cell; apex row is empty.
        let row = |j: usize| (0..g.nx()).filter(|&i| m.is_solid(i, j)).count();
        assert_eq!(row(20), 11);
        assert_eq!(row(29), 1);
        assert_eq!(row(30), 0);
        assert_eq!(row(19), 0);
    }

    #[test]
    fn triangle_rows_past_top_are_skipped() {
        let g = Grid::plane(1.0, 0.1, 1.0, 0.1).unwrap();
        let m = ObstacleMask::build(
            &spec(
                ObstacleShape::Triangle {
                    half_base: 20,
                    height: 8,
                    base_offset: 0,
                },
                5,
                8,
            ),
            &g,
        )
        .unwrap();
        // Rows 8, 9, 10 exist; the base row is clipped to the full width.
        assert_eq!((0..11).filter(|&i| m.is_solid(i, 8)).count(), 11);
        assert!(m.solid_count() > 0);
    }

    #[test]
    fn fractional_triangle_near_bottom_keeps_its_size() {
        let g = river(); // 101 x 101
        let tri = ObstacleSpec::from_fraction(ObstacleKind::Triangle, [50, 5], 0.1, &g).unwrap();
        // Base row would be 5 - 20 / 2 = -5.
        assert_eq!(
            tri.shape,
            ObstacleShape::Triangle {
                half_base: 10,
                height: 20,
                base_offset: -5,
            }
        );
        assert_eq!(tri.center, [50, 0]);
        let m = ObstacleMask::build(&tri, &g).unwrap();
        let row = |j: usize| (0..g.nx()).filter(|&i| m.is_solid(i, j)).count();
        // Row 0 is 5 rows above the base: half-width 10 * 15 / 20 = 7.
        assert_eq!(row(0), 15);
        assert_eq!(row(14), 1);
        assert_eq!(row(15), 0);
        assert_eq!(m.solid_count(), (5..20).map(|k| 2 * (10 * (20 - k) / 20) + 1).sum::<usize>());
    }

    #[test]
    fn triangle_yaml_base_offset_defaults_to_zero() {
        let tri: ObstacleSpec =
            serde_yaml::from_str("{ kind: triangle, half_base: 5, height: 10, center: [25, 20] }")
                .unwrap();
        assert_eq!(
            tri.shape,
            ObstacleShape::Triangle {
                half_base: 5,
                height: 10,
                base_offset: 0,
            }
        );
    }

    #[test]
    fn zero_size_is_rejected() {
        let g = river();
        let err = ObstacleMask::build(&spec(ObstacleShape::Circle { radius: 0 }, 50, 50), &g)
            .unwrap_err();
        assert_eq!(
            err,
            ShapeError::NonPositiveSize {
                kind: "circle",
                parameter: "radius"
            }
        );
    }

    #[test]
    fn out_of_grid_is_rejected() {
        let g = river();
        let err = ObstacleMask::build(&spec(ObstacleShape::Square { half_size: 10 }, 5, 50), &g)
            .unwrap_err();
        assert!(matches!(err, ShapeError::OutOfGrid { kind: "square", .. }));
        let err = ObstacleMask::build(&spec(ObstacleShape::Circle { radius: 3 }, 200, 50), &g)
            .unwrap_err();
        assert!(matches!(err, ShapeError::OutOfGrid { .. }));
    }

    #[test]
    fn bodies_require_a_plane() {
        let g = Grid::line(10.0, 0.1).unwrap();
        let err = ObstacleMask::build(&spec(ObstacleShape::Square { half_size: 1 }, 5, 0), &g)
            .unwrap_err();
        assert_eq!(err, ShapeError::RequiresPlane { kind: "square" });
        assert!(ObstacleMask::build(&ObstacleSpec::NONE, &g).unwrap().is_empty());
    }

    #[test]
    fn union_rejects_mismatched_shapes() {
        let a = ObstacleMask::empty(Shape::Plane { nx: 3, ny: 3 });
        let b = ObstacleMask::empty(Shape::Plane { nx: 3, ny: 4 });
        assert!(matches!(a.union(&b), Err(ShapeError::ShapeMismatch { .. })));
    }

    #[test]
    fn fractional_sizes_follow_grid() {
        let g = river(); // 101 x 101
        let rect = ObstacleSpec::from_fraction(ObstacleKind::Rectangle, [50, 50], 0.08, &g)
            .unwrap();
        assert_eq!(
            rect.shape,
            ObstacleShape::Rectangle {
                half_width: 4,
                half_height: 12
            }
        );
        let tri = ObstacleSpec::from_fraction(ObstacleKind::Triangle, [50, 50], 0.1, &g).unwrap();
        assert_eq!(
            tri.shape,
            ObstacleShape::Triangle {
                half_base: 10,
                height: 20,
                base_offset: 0,
            }
        );
        assert_eq!(tri.center, [50, 40]);
        assert!(ObstacleSpec::from_fraction(ObstacleKind::Square, [50, 50], 0.0, &g).is_err());
    }

    #[test]
    fn every_layout_fits_the_river_grid() {
        let g = river();
        for layout in ObstacleLayout::ALL {
            for kind in ObstacleKind::ALL {
                let mask = layout.mask(kind, &g).unwrap();
                assert_eq!(mask.is_empty(), kind == ObstacleKind::None, "{layout} {kind}");
            }
        }
    }

    #[test]
    fn trio_has_three_disjoint_bodies() {
        let g = river();
        let specs = ObstacleLayout::Trio.specs(ObstacleKind::Square, &g).unwrap();
        assert_eq!(specs.len(), 3);
        let total: usize = specs
            .iter()
            .map(|s| ObstacleMask::build(s, &g).unwrap().solid_count())
            .sum();
        let union = ObstacleLayout::Trio.mask(ObstacleKind::Square, &g).unwrap();
        assert_eq!(union.solid_count(), total);
    }

    #[test]
    fn apply_zeroes_both_components() {
        let g = Grid::plane(1.0, 0.1, 1.0, 0.1).unwrap();
        let m = ObstacleMask::build(&spec(ObstacleShape::Square { half_size: 1 }, 5, 5), &g)
            .unwrap();
        let n = g.cell_count();
        let mut state = FieldState::vector(g.shape(), vec![1.0; n], vec![2.0; n]).unwrap();
        m.apply(&mut state).unwrap();
        for (idx, solid) in m.cells().iter().enumerate() {
            let expect_u = if *solid { 0.0 } else { 1.0 };
            let expect_v = if *solid { 0.0 } else { 2.0 };
            assert_eq!(state.u()[idx], expect_u);
            assert_eq!(state.v().unwrap()[idx], expect_v);
        }
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Circle".parse::<ObstacleKind>(), Ok(ObstacleKind::Circle));
        assert_eq!(" none ".parse::<ObstacleKind>(), Ok(ObstacleKind::None));
        assert!("hexagon".parse::<ObstacleKind>().is_err());
        assert_eq!("TRIO".parse::<ObstacleLayout>(), Ok(ObstacleLayout::Trio));
        assert!("quad".parse::<ObstacleLayout>().is_err());
    }

    fn arb_mask() -> impl Strategy<Value = ObstacleMask> {
        proptest::collection::vec(any::<bool>(), 24).prop_map(|cells| ObstacleMask {
            shape: Shape::Plane { nx: 6, ny: 4 },
            cells,
        })
    }

    proptest! {
        #[test]
        fn union_is_commutative(a in arb_mask(), b in arb_mask()) {
            prop_assert_eq!(a.union(&b).unwrap(), b.union(&a).unwrap());
        }

        #[test]
        fn union_is_idempotent(a in arb_mask()) {
            prop_assert_eq!(a.union(&a).unwrap(), a);
        }
    }
}
