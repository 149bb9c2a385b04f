//! Shared grids and fields.

use spate_core::FieldState;
use spate_space::Grid;

/// The 28 km channel at 0.1 km spacing used by the city scenarios.
pub fn city_line() -> Grid {
    Grid::line(28.0, 0.1).expect("valid channel grid")
}

/// The 1 × 2 river domain with 101 × 101 cells.
pub fn river_plane() -> Grid {
    Grid::plane(1.0, 0.01, 2.0, 0.02).expect("valid river grid")
}

/// A 4 × 3 plane with unit spacing, small enough to check by hand.
pub fn small_plane() -> Grid {
    Grid::plane(3.0, 1.0, 2.0, 1.0).expect("valid small grid")
}

/// `baseline + amplitude · exp(-((x - center) / width)²)` on a line.
pub fn gaussian_line(grid: &Grid, center: f64, width: f64, amplitude: f64, baseline: f64) -> FieldState {
    let u = (0..grid.nx())
        .map(|i| {
            let z = (grid.x_axis().coord(i) - center) / width;
            baseline + amplitude * (-z * z).exp()
        })
        .collect();
    FieldState::scalar(grid.shape(), u).expect("length matches grid")
}

/// Constant `u` and `v` over every cell.
pub fn uniform_vector(grid: &Grid, u: f64, v: f64) -> FieldState {
    let n = grid.cell_count();
    FieldState::vector(grid.shape(), vec![u; n], vec![v; n]).expect("length matches grid")
}
