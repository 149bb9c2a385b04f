//! Domain edges and stencil edge behavior.

use std::fmt;

/// How a stencil resolves a neighbour index that falls off the grid.
///
/// This controls *topology* only. What value an edge cell finally holds is
/// decided afterwards by the boundary policy bound to that edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour maps to the edge cell itself.
    Clamp,
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
}

/// A grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisId {
    /// Columns.
    X,
    /// Rows.
    Y,
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// One side of the rectangular domain.
///
/// `Bottom` is row 0 and `Top` is row `ny - 1`; `Left` is column 0 and
/// `Right` is column `nx - 1`. A line only has `Left` and `Right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Column 0.
    Left,
    /// Column `nx - 1`.
    Right,
    /// Row 0.
    Bottom,
    /// Row `ny - 1`.
    Top,
}

impl Edge {
    /// Edges of a line, in application order.
    pub const LINE: [Edge; 2] = [Edge::Left, Edge::Right];

    /// Edges of a plane, in application order. The side edges go last so
    /// they own the corner cells.
    pub const PLANE: [Edge; 4] = [Edge::Bottom, Edge::Top, Edge::Left, Edge::Right];

    /// Axis this edge terminates.
    pub fn axis(self) -> AxisId {
        match self {
            Self::Left | Self::Right => AxisId::X,
            Self::Bottom | Self::Top => AxisId::Y,
        }
    }

    /// The edge across the domain.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Top => "top",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for e in Edge::PLANE {
            assert_eq!(e.opposite().opposite(), e);
            assert_eq!(e.opposite().axis(), e.axis());
        }
    }

    #[test]
    fn side_edges_applied_last() {
        assert_eq!(&Edge::PLANE[2..], &[Edge::Left, Edge::Right]);
    }
}
