use crate::grid::Grid;

/// Accumulated movement cost.
pub type Cost = u32;

/// Sentinel for a move or cell that cannot be reached. Never a valid finite cost.
pub const UNREACHABLE: Cost = Cost::MAX;

/// Adds two costs without wrapping. Anything involving [UNREACHABLE] stays unreachable and
/// sums that would overflow saturate to it.
pub fn cost_add(a: Cost, b: Cost) -> Cost {
    if a == UNREACHABLE || b == UNREACHABLE {
        UNREACHABLE
    } else {
        a.saturating_add(b)
    }
}

/// The read-only view of a map that the finders search over. Implementations own the terrain
/// representation; the search only asks whether a cell can be entered and what entering it costs.
pub trait NavigationMap {
    /// Number of columns and rows.
    fn dimensions(&self) -> (u32, u32);

    /// Whether the cell can be entered. Must be `false` for cells outside the map.
    fn can_cross(&self, grid: Grid) -> bool;

    /// Cost of entering the cell. Only queried for cells where [can_cross](Self::can_cross) holds.
    fn cost(&self, grid: Grid) -> Cost;

    /// The smallest per-cell cost on the map, used to scale the heuristic.
    fn min_cost(&self) -> Cost;

    /// Cheap connectivity test run before searching. Maps that track connected components can
    /// reject unreachable destinations here; the default assumes everything may be connected.
    fn connected(&self, _from: Grid, _to: Grid) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_add_never_wraps() {
        assert_eq!(cost_add(3, 4), 7);
        assert_eq!(cost_add(UNREACHABLE, 0), UNREACHABLE);
        assert_eq!(cost_add(1, UNREACHABLE), UNREACHABLE);
        assert_eq!(cost_add(UNREACHABLE - 1, 5), UNREACHABLE);
    }
}
