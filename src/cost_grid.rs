use crate::error::MapParseError;
use crate::grid::{Grid, DOWN, ORTHOGONAL, RIGHT};
use crate::map::{Cost, NavigationMap, UNREACHABLE};
use core::fmt;
use grid_util::grid::{BoolGrid, SimpleValueGrid, ValueGrid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use std::str::FromStr;

/// [CostGrid] is a reference [NavigationMap]: a rectangle of cells that are either blocked or
/// enterable at a per-cell cost. Connected components are maintained with a [UnionFind] so that
/// searches between disconnected cells can be rejected without flood-filling the map.
#[derive(Clone, Debug)]
pub struct CostGrid {
    blocked: BoolGrid,
    costs: SimpleValueGrid<Cost>,
    min_cost: Cost,
    /// Number of cells whose cost equals `min_cost`.
    min_cost_cells: usize,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for CostGrid {
    fn default() -> CostGrid {
        CostGrid::new(0, 0, 1)
    }
}

impl CostGrid {
    /// Creates a fully open grid where every cell costs `cost` to enter. Components start out
    /// dirty; call [generate_components](Self::generate_components) to enable early rejection.
    pub fn new(width: usize, height: usize, cost: Cost) -> CostGrid {
        let cells = width * height;
        CostGrid {
            blocked: BoolGrid::new(width, height, false),
            costs: SimpleValueGrid::new(width, height, cost),
            min_cost: if cells == 0 { 0 } else { cost },
            min_cost_cells: cells,
            components: UnionFind::new(cells),
            components_dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.costs.width()
    }

    pub fn height(&self) -> usize {
        self.costs.height()
    }

    pub fn in_bounds(&self, grid: Grid) -> bool {
        self.costs.point_in_bounds(grid.into())
    }

    /// Cells outside the grid count as blocked.
    pub fn is_blocked(&self, grid: Grid) -> bool {
        !self.in_bounds(grid) || self.blocked.get_point(grid.into())
    }

    /// Blocks or unblocks a cell. Joins newly connected components and flags the components as
    /// dirty if they are (potentially) broken apart into multiple. Out of bounds cells are ignored.
    pub fn set_blocked(&mut self, grid: Grid, blocked: bool) {
        if !self.in_bounds(grid) || self.blocked.get_point(grid.into()) == blocked {
            return;
        }
        self.blocked.set_point(grid.into(), blocked);
        if blocked {
            self.components_dirty = true;
        } else {
            let ix = self.blocked.get_ix_point(&grid.into());
            for dir in ORTHOGONAL {
                let n = grid + dir;
                if !self.is_blocked(n) {
                    self.components
                        .union(ix, self.blocked.get_ix_point(&n.into()));
                }
            }
        }
    }

    /// Sets the cost of entering a cell. Out of bounds cells are ignored.
    pub fn set_cost(&mut self, grid: Grid, cost: Cost) {
        if !self.in_bounds(grid) {
            return;
        }
        let point = Point::from(grid);
        let old = self.costs.get_point(point);
        if old == cost {
            return;
        }
        self.costs.set_point(point, cost);
        if cost < self.min_cost {
            self.min_cost = cost;
            self.min_cost_cells = 1;
        } else if cost == self.min_cost {
            self.min_cost_cells += 1;
        } else if old == self.min_cost {
            self.min_cost_cells -= 1;
            if self.min_cost_cells == 0 {
                self.recompute_min_cost();
            }
        }
    }

    /// Rescans all cells once the last cell holding the minimum was raised.
    fn recompute_min_cost(&mut self) {
        let values = &self.costs.values;
        self.min_cost = values.iter().copied().min().unwrap_or(0);
        self.min_cost_cells = values.iter().filter(|c| **c == self.min_cost).count();
    }

    /// Sets the cost of every cell in the rectangle spanned by `corner` and the given size.
    pub fn set_cost_rect(&mut self, corner: Grid, width: i32, height: i32, cost: Cost) {
        for row in corner.row..corner.row + height {
            for col in corner.col..corner.col + width {
                self.set_cost(Grid::new(col, row), cost);
            }
        }
    }

    /// Blocks or unblocks every cell in the rectangle spanned by `corner` and the given size.
    pub fn set_blocked_rect(&mut self, corner: Grid, width: i32, height: i32, blocked: bool) {
        for row in corner.row..corner.row + height {
            for col in corner.col..corner.col + width {
                self.set_blocked(Grid::new(col, row), blocked);
            }
        }
    }

    /// Retrieves the component id a given cell belongs to, or `None` outside the grid.
    pub fn get_component(&self, grid: Grid) -> Option<usize> {
        self.in_bounds(grid)
            .then(|| self.components.find(self.costs.get_ix_point(&grid.into())))
    }

    /// Checks if start and goal are on the same component. Only meaningful while the components
    /// are not dirty.
    pub fn reachable(&self, start: Grid, goal: Grid) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: Grid, goal: Grid) -> bool {
        if self.in_bounds(start) && self.in_bounds(goal) {
            !self.components.equiv(
                self.costs.get_ix_point(&start.into()),
                self.costs.get_ix_point(&goal.into()),
            )
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid neighbours to the same
    /// components. Diagonal steps are only possible through an open orthogonal cell, so the
    /// 4-neighbourhood decides connectivity for both strategies.
    pub fn generate_components(&mut self) {
        let (width, height) = (self.width(), self.height());
        info!("Generating connected components for {}x{} grid", width, height);
        self.components = UnionFind::new(width * height);
        self.components_dirty = false;
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let grid = Grid::new(col, row);
                if self.is_blocked(grid) {
                    continue;
                }
                let ix = self.blocked.get_ix_point(&grid.into());
                for n in [grid + RIGHT, grid + DOWN] {
                    if !self.is_blocked(n) {
                        self.components
                            .union(ix, self.blocked.get_ix_point(&n.into()));
                    }
                }
            }
        }
    }
}

impl NavigationMap for CostGrid {
    fn dimensions(&self) -> (u32, u32) {
        (self.width() as u32, self.height() as u32)
    }

    fn can_cross(&self, grid: Grid) -> bool {
        !self.is_blocked(grid)
    }

    /// [UNREACHABLE] outside the grid.
    fn cost(&self, grid: Grid) -> Cost {
        if self.in_bounds(grid) {
            self.costs.get_point(grid.into())
        } else {
            UNREACHABLE
        }
    }

    fn min_cost(&self) -> Cost {
        self.min_cost
    }

    fn connected(&self, from: Grid, to: Grid) -> bool {
        self.components_dirty || self.reachable(from, to)
    }
}

/// Parses rows of `#` (blocked), `.` (cost 1) and `0`-`9` (explicit cost). Blank lines and
/// surrounding whitespace are ignored.
impl FromStr for CostGrid {
    type Err = MapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().ok_or(MapParseError::Empty)?.chars().count();
        let mut grid = CostGrid::new(width, rows.len(), 1);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapParseError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, c) in line.chars().enumerate() {
                let cell = Grid::new(col as i32, row as i32);
                match c {
                    '#' => grid.set_blocked(cell, true),
                    '.' => {}
                    '0'..='9' => grid.set_cost(cell, c as Cost - '0' as Cost),
                    found => return Err(MapParseError::InvalidCell { col, row, found }),
                }
            }
        }
        grid.generate_components();
        Ok(grid)
    }
}

/// Renders the grid in the format accepted by [FromStr]; costs above 9 are shown as `+`.
impl fmt::Display for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.height() as i32 {
            for col in 0..self.width() as i32 {
                let grid = Grid::new(col, row);
                let c = if self.is_blocked(grid) {
                    '#'
                } else {
                    match self.cost(grid) {
                        1 => '.',
                        c @ 0..=9 => char::from_digit(c, 10).unwrap_or('?'),
                        _ => '+',
                    }
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
