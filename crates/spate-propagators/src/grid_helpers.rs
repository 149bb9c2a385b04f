//! Neighbour resolution shared by the stencils.

use spate_space::EdgeBehavior;

/// Resolve a possibly out-of-range index on an axis of `len` cells.
pub(crate) fn resolve_axis(val: isize, len: usize, edge: EdgeBehavior) -> usize {
    let n = len as isize;
    if val >= 0 && val < n {
        return val as usize;
    }
    match edge {
        EdgeBehavior::Clamp => val.clamp(0, n - 1) as usize,
        EdgeBehavior::Wrap => val.rem_euclid(n) as usize,
    }
}

/// `(previous, next)` neighbour of every index along an axis.
pub(crate) fn neighbour_table(len: usize, edge: EdgeBehavior) -> Vec<(usize, usize)> {
    (0..len as isize)
        .map(|i| (resolve_axis(i - 1, len, edge), resolve_axis(i + 1, len, edge)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_axis_in_bounds() {
        assert_eq!(resolve_axis(2, 5, EdgeBehavior::Clamp), 2);
        assert_eq!(resolve_axis(0, 5, EdgeBehavior::Wrap), 0);
    }

    #[test]
    fn resolve_axis_clamp() {
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Clamp), 0);
        assert_eq!(resolve_axis(7, 5, EdgeBehavior::Clamp), 4);
    }

    #[test]
    fn resolve_axis_wrap() {
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Wrap), 4);
        assert_eq!(resolve_axis(5, 5, EdgeBehavior::Wrap), 0);
        assert_eq!(resolve_axis(7, 5, EdgeBehavior::Wrap), 2);
    }

    #[test]
    fn neighbour_table_edges() {
        let clamp = neighbour_table(4, EdgeBehavior::Clamp);
        assert_eq!(clamp, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
        let wrap = neighbour_table(4, EdgeBehavior::Wrap);
        assert_eq!(wrap[0], (3, 1));
        assert_eq!(wrap[3], (2, 0));
    }
}
