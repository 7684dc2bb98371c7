use crate::grid::{Grid, Vector, OBLIQUE, ORTHOGONAL, START};
use crate::map::{cost_add, Cost, NavigationMap, UNREACHABLE};
use crate::node::{NodeId, PathNode, Residence};
use crate::search::{Heuristic, Offer, SearchContext};
use crate::solver::Strategy;
use smallvec::{smallvec, SmallVec};

/// Jump Point Search on a weighted grid.
///
/// Each expanded node first scans straight lines in the orthogonal directions compatible with
/// the direction it was reached from, registering a jump point wherever a blocked side cell
/// forces a diagonal turn. If that finds anything, the node goes back into the open set and its
/// diagonals are only followed once it is popped again. Diagonals are walked one step at a time;
/// every cell on the way gets an intermediate node that repeats the straight scans, and is
/// discarded again if it turns out not to be a jump point.
///
/// A listed node that is reached more cheaply is reached from a different direction, so it is
/// turned back into a jump point for that direction and queued to run both passes again.
#[derive(Clone, Copy, Debug)]
pub struct Jps {
    /// A diagonal step costs only the entered cell. When disabled, it also pays for the cheaper
    /// of the two orthogonal cells it passes, as if the corner was walked around.
    pub oblique_move: bool,
}

impl Default for Jps {
    fn default() -> Jps {
        Jps { oblique_move: true }
    }
}

/// Whether `direction` points back against a component of `travel`.
fn opposes(travel: Vector, direction: Vector) -> bool {
    (travel.x != 0 && direction.x == -travel.x) || (travel.y != 0 && direction.y == -travel.y)
}

impl Jps {
    pub fn new(oblique_move: bool) -> Jps {
        Jps { oblique_move }
    }

    /// Cost of a single diagonal step from `from`, or [UNREACHABLE] if the target is blocked or
    /// the step would squeeze between two blocked cells.
    fn step_cost<M: NavigationMap + ?Sized>(&self, map: &M, from: Grid, direction: Vector) -> Cost {
        let target = from + direction;
        if !map.can_cross(target) {
            return UNREACHABLE;
        }
        let escape = [direction.x_dir(), direction.y_dir()]
            .into_iter()
            .map(|v| from + v)
            .filter(|cell| map.can_cross(*cell))
            .map(|cell| map.cost(cell))
            .min();
        match escape {
            None => UNREACHABLE,
            Some(_) if self.oblique_move => map.cost(target),
            Some(escape) => cost_add(map.cost(target), escape),
        }
    }

    /// Diagonals that a straight scan arriving at `cell` with `travel` cannot cover, because a
    /// blocked cell beside it hides the diagonal neighbour behind it.
    fn forced_neighbours<M: NavigationMap + ?Sized>(
        &self,
        map: &M,
        cell: Grid,
        travel: Vector,
    ) -> SmallVec<[Vector; 2]> {
        let blocked = |v: Vector| !map.can_cross(cell + v);
        OBLIQUE
            .into_iter()
            .filter(|d| {
                let beside_x = travel.y == d.y && travel.x != d.x && blocked(d.x_dir());
                let beside_y = travel.x == d.x && travel.y != d.y && blocked(d.y_dir());
                (beside_x || beside_y) && self.step_cost(map, cell, *d) != UNREACHABLE
            })
            .collect()
    }

    fn oblique_directions(&self, node: &PathNode) -> SmallVec<[Vector; 4]> {
        let travel = node.direction();
        if travel.is_oblique() {
            let mut directions: SmallVec<[Vector; 4]> = smallvec![travel];
            if node.jump_point {
                for forced in &node.forced {
                    if !directions.contains(forced) {
                        directions.push(*forced);
                    }
                }
            }
            directions
        } else {
            OBLIQUE
                .into_iter()
                .filter(|d| travel.is_empty() || d.x == travel.x || d.y == travel.y)
                .collect()
        }
    }

    fn find_jump_point<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
    ) {
        if self.orthogonal_pass(ctx, map, node) {
            return;
        }
        if !ctx.node(node).oblique_done {
            ctx.node_mut(node).oblique_done = true;
            for direction in self.oblique_directions(ctx.node(node)) {
                self.walk_oblique(ctx, map, node, direction);
                if ctx.terminal().is_some() {
                    break;
                }
            }
        }
    }

    /// Runs the straight scans of `node` unless they already ran. Returns true if the destination
    /// was reached or the node was queued to follow its diagonals later.
    fn orthogonal_pass<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
    ) -> bool {
        if ctx.node(node).orthogonal_done {
            return false;
        }
        let found = self.scan_orthogonal(ctx, map, node);
        ctx.node_mut(node).orthogonal_done = true;
        found && (ctx.terminal().is_some() || ctx.push_open(node))
    }

    fn scan_orthogonal<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
    ) -> bool {
        let travel = ctx.node(node).direction();
        let mut found = false;
        for direction in ORTHOGONAL.into_iter().filter(|d| !opposes(travel, *d)) {
            found |= self.jump_orthogonal(ctx, map, node, direction);
            if ctx.terminal().is_some() {
                break;
            }
        }
        found
    }

    /// Scans from `node` along `direction` until the destination, a blocked cell or a forced
    /// neighbour is met. An intermediate node also checks its own cell. Returns whether anything
    /// was registered.
    fn jump_orthogonal<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
        direction: Vector,
    ) -> bool {
        let (origin, arrival, jump_point, mut g) = {
            let n = ctx.node(node);
            (n.grid(), n.direction(), n.jump_point, n.g())
        };
        let mut cell = origin;
        if jump_point {
            cell = cell + direction;
            if !map.can_cross(cell) {
                return false;
            }
            g = cost_add(g, map.cost(cell));
        }
        let mut found = false;
        loop {
            let at_origin = cell == origin;
            let travel = if at_origin { arrival } else { direction };
            if cell == ctx.destination() {
                if let Some(terminal) =
                    self.register(ctx, map, node, cell, travel, g, SmallVec::new())
                {
                    ctx.set_terminal(terminal);
                }
                return true;
            }
            let forced = self.forced_neighbours(map, cell, travel);
            if !forced.is_empty() {
                self.register(ctx, map, node, cell, travel, g, forced);
                found = true;
                if !at_origin {
                    break;
                }
            }
            let next = cell + direction;
            if !map.can_cross(next) {
                break;
            }
            cell = next;
            g = cost_add(g, map.cost(cell));
        }
        found
    }

    /// Registers `cell`, reached from `node` at cost `g`, as a jump point. The scanning node is
    /// marked as one too. Returns `None` if the cell already had a listed node, which is then
    /// offered the route instead.
    #[allow(clippy::too_many_arguments)]
    fn register<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
        cell: Grid,
        travel: Vector,
        g: Cost,
        forced: SmallVec<[Vector; 2]>,
    ) -> Option<NodeId> {
        ctx.node_mut(node).jump_point = true;
        let id = if cell == ctx.node(node).grid() {
            node
        } else if self.offer(ctx, map, cell, Some(node), travel, g) {
            return None;
        } else {
            ctx.add_open(cell, Some(node), travel, g)
        };
        let n = ctx.node_mut(id);
        n.jump_point = true;
        n.forced = forced;
        Some(id)
    }

    /// Offers a route to the listed node of `cell`, if there is one. An improved node becomes a
    /// jump point for its new direction and goes back into the open set to redo both passes.
    fn offer<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        cell: Grid,
        parent: Option<NodeId>,
        travel: Vector,
        g: Cost,
    ) -> bool {
        match ctx.offer(cell, parent, travel, g) {
            Offer::Absent => false,
            Offer::Kept(_) => true,
            Offer::Improved(id) => {
                let forced = self.forced_neighbours(map, cell, travel);
                let n = ctx.node_mut(id);
                n.jump_point = true;
                n.forced = forced;
                n.orthogonal_done = false;
                n.oblique_done = false;
                ctx.push_open(id);
                true
            }
        }
    }

    /// Walks from `node` along `direction` one cell at a time. Each cell gets an intermediate
    /// node that runs the straight scans; the walk stops at the first one that found a jump point,
    /// since that node carries on along the diagonal once it is popped. Intermediate nodes that
    /// are neither listed nor a parent are discarded afterwards.
    fn walk_oblique<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
        direction: Vector,
    ) {
        let mut trail: Vec<NodeId> = Vec::new();
        let mut from = node;
        while let Some(next) = self.step_oblique(ctx, map, from, direction) {
            trail.push(next);
            if self.orthogonal_pass(ctx, map, next) {
                break;
            }
            // Not a jump point, so the walked diagonal is the only one it has.
            ctx.node_mut(next).oblique_done = true;
            from = next;
        }
        for id in trail.into_iter().rev() {
            let n = ctx.node(id);
            if n.residence() == Residence::Unlisted && n.children().is_empty() {
                ctx.discard(id);
            }
        }
    }

    /// Takes one diagonal step from `node`. Returns the intermediate node to continue from, or
    /// `None` if the step is impossible, reaches the destination or meets a listed node.
    fn step_oblique<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
        direction: Vector,
    ) -> Option<NodeId> {
        let (from, g, parent) = {
            let n = ctx.node(node);
            let parent = if n.jump_point { Some(node) } else { n.parent() };
            (n.grid(), n.g(), parent)
        };
        let step = self.step_cost(map, from, direction);
        if step == UNREACHABLE {
            return None;
        }
        let g = cost_add(g, step);
        let next = from + direction;
        if next == ctx.destination() {
            let terminal = ctx.create_node(next, parent, direction, g);
            ctx.set_terminal(terminal);
            return None;
        }
        if self.offer(ctx, map, next, parent, direction, g) {
            return None;
        }
        Some(ctx.create_node(next, parent, direction, g))
    }
}

impl Strategy for Jps {
    fn create_first_node(&self, ctx: &mut SearchContext, start: Grid) -> NodeId {
        let id = ctx.create_node(start, None, START, 0);
        ctx.node_mut(id).jump_point = true;
        id
    }

    fn expand<M: NavigationMap + ?Sized>(&self, ctx: &mut SearchContext, map: &M, node: NodeId) {
        self.find_jump_point(ctx, map, node);
    }

    fn heuristic(&self) -> Heuristic {
        if self.oblique_move {
            Heuristic::Chebyshev
        } else {
            Heuristic::Manhattan
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_grid::CostGrid;
    use crate::grid::{DOWN, LEFT_DOWN, RIGHT, RIGHT_DOWN, UP};
    use crate::solver::{path_cost, AStarFinder, JpsFinder, PathFinder, Waypoint};

    fn grids(path: &[Waypoint]) -> Vec<Grid> {
        path.iter().map(|w| w.grid).collect()
    }

    fn corridor() -> CostGrid {
        // The only way down is the column on the right, entered diagonally from (2, 0).
        "
        ....
        ###.
        ###.
        ###.
        "
        .parse()
        .unwrap()
    }

    /// On an open grid the destination is reached by a single diagonal from the start.
    #[test]
    fn solve_open_grid() {
        let grid = CostGrid::new(5, 5, 1);
        for (oblique_move, expected) in [(true, 4), (false, 8)] {
            let mut finder = PathFinder::new(Jps::new(oblique_move));
            let path = finder
                .find_path(&grid, Grid::new(0, 0), Grid::new(4, 4))
                .unwrap()
                .unwrap();
            assert_eq!(grids(&path), vec![Grid::new(0, 0), Grid::new(4, 4)]);
            assert_eq!(path[1].direction, RIGHT_DOWN);
            assert_eq!(path_cost(&path), expected);
            assert_eq!(finder.stats().expanded, 1);
        }
    }

    #[test]
    fn straight_line() {
        let grid = CostGrid::new(5, 1, 2);
        let mut finder = JpsFinder::default();
        let path = finder
            .find_path(&grid, Grid::new(0, 0), Grid::new(4, 0))
            .unwrap()
            .unwrap();
        assert_eq!(grids(&path), vec![Grid::new(0, 0), Grid::new(4, 0)]);
        assert_eq!(path[1].direction, RIGHT);
        assert_eq!(path_cost(&path), 8);
    }

    /// The forced neighbour at (2, 0) makes it a jump point; the diagonal into the corridor then
    /// yields (3, 1), which sees the destination straight below.
    #[test]
    fn forced_neighbour_leads_into_corridor() {
        let grid = corridor();
        let expected = vec![
            Grid::new(0, 0),
            Grid::new(2, 0),
            Grid::new(3, 1),
            Grid::new(3, 3),
        ];

        let mut finder = JpsFinder::default();
        let path = finder
            .find_path(&grid, Grid::new(0, 0), Grid::new(3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(grids(&path), expected);
        assert_eq!(
            path.iter().map(|w| w.cost).collect::<Vec<_>>(),
            vec![0, 2, 3, 5]
        );
        assert_eq!(path[3].direction, DOWN);
        // The start is expanded twice: once for its straight scans, once for its diagonals.
        assert_eq!(finder.stats().expanded, 3);

        let mut finder = PathFinder::new(Jps::new(false));
        let path = finder
            .find_path(&grid, Grid::new(0, 0), Grid::new(3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(grids(&path), expected);
        assert_eq!(
            path.iter().map(|w| w.cost).collect::<Vec<_>>(),
            vec![0, 2, 4, 6]
        );
    }

    #[test]
    fn wall_exhausts_search() {
        let mut grid = CostGrid::new(5, 5, 1);
        grid.set_blocked_rect(Grid::new(2, 0), 1, 5, true);
        let mut finder = JpsFinder::default();
        let path = finder
            .find_path(&grid, Grid::new(0, 2), Grid::new(4, 2))
            .unwrap();
        assert!(path.is_none());
        assert!(finder.stats().expanded > 0);
    }

    #[test]
    fn expands_fewer_nodes_than_astar() {
        let grid = CostGrid::new(20, 20, 1);
        let start = Grid::new(0, 0);
        let goal = Grid::new(19, 19);
        let mut jps = JpsFinder::default();
        let mut astar = AStarFinder::default();
        assert!(jps.find_path(&grid, start, goal).unwrap().is_some());
        assert!(astar.find_path(&grid, start, goal).unwrap().is_some());
        assert!(jps.stats().expanded < astar.stats().expanded);
    }

    /// On both maps a listed node is later reached more cheaply from another direction, and has
    /// to be expanded again under the new direction to find the optimum.
    #[test]
    fn cheaper_arrival_reopens_jump_point() {
        let free_diagonals: CostGrid = "
            .##.......
            ....#..#..
            ...#.#..##
            ..#.#..##.
            ..#....###
            .....#....
            ....#.##..
            ...##.#..#
            .###.#...#
            ..........
        "
        .parse()
        .unwrap();
        let paid_diagonals: CostGrid = "
            ....#.#..#
            ..........
            ....#.....
            ..###...##
            #.......#.
            ...#.#.##.
            .#.##.#..#
            ..........
            .#.....#..
            #..#.#.#..
        "
        .parse()
        .unwrap();
        let (start, goal) = (Grid::new(0, 0), Grid::new(9, 9));
        let mut astar = AStarFinder::default();
        let optimum = astar.find_path(&paid_diagonals, start, goal).unwrap().unwrap();
        assert_eq!(path_cost(&optimum), 18);
        for (grid, oblique_move, expected) in
            [(&free_diagonals, true, 13), (&paid_diagonals, false, 18)]
        {
            let mut finder = PathFinder::new(Jps::new(oblique_move));
            let path = finder.find_path(grid, start, goal).unwrap().unwrap();
            assert_eq!(path_cost(&path), expected);
        }
    }

    #[test]
    fn diagonal_step_cost() {
        let grid: CostGrid = "
            .#
            32
        "
        .parse()
        .unwrap();
        let from = Grid::new(0, 0);
        assert_eq!(Jps::new(true).step_cost(&grid, from, RIGHT_DOWN), 2);
        assert_eq!(Jps::new(false).step_cost(&grid, from, RIGHT_DOWN), 5);

        let squeezed: CostGrid = "
            .#
            #.
        "
        .parse()
        .unwrap();
        for oblique_move in [true, false] {
            let jps = Jps::new(oblique_move);
            assert_eq!(jps.step_cost(&squeezed, from, RIGHT_DOWN), UNREACHABLE);
            assert_eq!(jps.step_cost(&grid, Grid::new(1, 1), RIGHT_DOWN), UNREACHABLE);
        }
    }

    #[test]
    fn forced_neighbours() {
        let grid = corridor();
        let jps = Jps::default();
        assert_eq!(
            jps.forced_neighbours(&grid, Grid::new(2, 0), RIGHT).as_slice(),
            &[RIGHT_DOWN]
        );
        // The diagonal behind (1, 1) leads into another blocked cell.
        assert!(jps
            .forced_neighbours(&grid, Grid::new(1, 0), RIGHT)
            .is_empty());
        // (2, 2) is blocked, so arriving diagonally at (3, 1) forces nothing.
        assert!(jps
            .forced_neighbours(&grid, Grid::new(3, 1), RIGHT_DOWN)
            .is_empty());
        assert!(jps
            .forced_neighbours(&CostGrid::new(3, 3, 1), Grid::new(1, 1), LEFT_DOWN)
            .is_empty());
    }

    #[test]
    fn orthogonal_scan_directions() {
        let dirs = |travel: Vector| {
            ORTHOGONAL
                .into_iter()
                .filter(|d| !opposes(travel, *d))
                .collect::<Vec<_>>()
        };
        assert_eq!(dirs(START), ORTHOGONAL.to_vec());
        assert_eq!(dirs(RIGHT), vec![RIGHT, DOWN, UP]);
        assert_eq!(dirs(RIGHT_DOWN), vec![RIGHT, DOWN]);
    }
}
