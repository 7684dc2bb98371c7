//! # grid_nav
//!
//! Pathfinding on weighted grids. A single best-first search framework keeps the node tree and
//! the open and closed sets, while a strategy decides how nodes are expanded:
//! - [AStar](solver::astar::AStar) visits the four orthogonal neighbours of every node.
//! - [Jps](solver::jps::Jps) implements
//!   [Jump Point Search](https://en.wikipedia.org/wiki/Jump_point_search), skipping straight
//!   runs of cells and only stopping at jump points.
//!
//! Maps are anything implementing [NavigationMap]. [CostGrid] is a ready-made one that also
//! tracks [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to reject unreachable destinations without searching.
//!
//! ```
//! use grid_nav::{CostGrid, Grid, JpsFinder};
//!
//! let grid: CostGrid = "
//!     .....
//!     .###.
//!     .....
//! "
//! .parse()
//! .unwrap();
//! let mut finder = JpsFinder::default();
//! let path = finder
//!     .find_path(&grid, Grid::new(0, 1), Grid::new(4, 1))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.first().unwrap().grid, Grid::new(0, 1));
//! assert_eq!(path.last().unwrap().grid, Grid::new(4, 1));
//! ```
pub mod cost_grid;
pub mod error;
pub mod grid;
pub mod map;
mod node;
pub mod search;
pub mod solver;

pub use cost_grid::CostGrid;
pub use error::{MapParseError, SearchError};
pub use grid::{Grid, Vector};
pub use map::{Cost, NavigationMap, UNREACHABLE};
pub use node::{NodeId, PathNode, Residence};
pub use solver::astar::AStar;
pub use solver::jps::Jps;
pub use solver::{
    path_cost, AStarFinder, FinderConfig, JpsFinder, PathFinder, SearchStats, Strategy, Waypoint,
};

use itertools::Itertools;

/// Turns waypoints into a path on the grid which can be followed step by step. Diagonal
/// segments stay diagonal; use [orthogonal_path] when only orthogonal steps are allowed.
pub fn waypoints_to_path(waypoints: &[Waypoint]) -> Vec<Grid> {
    let mut path: Vec<Grid> = waypoints.iter().take(1).map(|w| w.grid).collect();
    for (from, to) in waypoints.iter().tuple_windows() {
        let mut current = from.grid;
        while current != to.grid {
            current = current + current.direction_to(&to.grid);
            path.push(current);
        }
    }
    path
}

/// Like [waypoints_to_path], but every diagonal step is split into two orthogonal steps through
/// the cheaper open corner of `map`. Corners are left out if neither is open.
pub fn orthogonal_path<M: NavigationMap + ?Sized>(waypoints: &[Waypoint], map: &M) -> Vec<Grid> {
    let steps = waypoints_to_path(waypoints);
    let mut path: Vec<Grid> = steps.iter().take(1).copied().collect();
    for (from, to) in steps.iter().tuple_windows() {
        let direction = from.direction_to(to);
        if direction.is_oblique() {
            let corner = [*from + direction.x_dir(), *from + direction.y_dir()]
                .into_iter()
                .filter(|cell| map.can_cross(*cell))
                .min_by_key(|cell| map.cost(*cell));
            path.extend(corner);
        }
        path.push(*to);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DOWN, RIGHT, RIGHT_DOWN, START};

    fn waypoint(col: i32, row: i32, direction: Vector, cost: Cost) -> Waypoint {
        Waypoint {
            grid: Grid::new(col, row),
            direction,
            cost,
        }
    }

    #[test]
    fn expands_straight_and_diagonal_segments() {
        let waypoints = [
            waypoint(0, 0, START, 0),
            waypoint(2, 2, RIGHT_DOWN, 2),
            waypoint(4, 2, RIGHT, 4),
            waypoint(4, 3, DOWN, 5),
        ];
        assert_eq!(
            waypoints_to_path(&waypoints),
            vec![
                Grid::new(0, 0),
                Grid::new(1, 1),
                Grid::new(2, 2),
                Grid::new(3, 2),
                Grid::new(4, 2),
                Grid::new(4, 3),
            ]
        );
        assert_eq!(path_cost(&waypoints), 5);
    }

    #[test]
    fn empty_and_single_waypoint() {
        assert!(waypoints_to_path(&[]).is_empty());
        assert_eq!(
            waypoints_to_path(&[waypoint(3, 3, START, 0)]),
            vec![Grid::new(3, 3)]
        );
    }

    #[test]
    fn orthogonal_path_takes_cheaper_corner() {
        let grid: CostGrid = "
            .5.
            1..
            ...
        "
        .parse()
        .unwrap();
        let waypoints = [waypoint(0, 0, START, 0), waypoint(2, 2, RIGHT_DOWN, 4)];
        assert_eq!(
            orthogonal_path(&waypoints, &grid),
            vec![
                Grid::new(0, 0),
                Grid::new(0, 1),
                Grid::new(1, 1),
                // Equal corners resolve to the horizontal one.
                Grid::new(2, 1),
                Grid::new(2, 2),
            ]
        );
    }
}
