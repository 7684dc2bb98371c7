use crate::grid::{Grid, Vector, DOWN, LEFT, RIGHT, START, UP};
use crate::map::{cost_add, NavigationMap};
use crate::node::NodeId;
use crate::search::SearchContext;
use crate::solver::Strategy;

/// Plain A* over the four orthogonal neighbours. The destination is accepted as soon as it is
/// generated, which is optimal for the consistent Manhattan heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStar;

const NEIGHBOURS: [Vector; 4] = [LEFT, RIGHT, UP, DOWN];

impl AStar {
    /// Handles one neighbour of `node`. Returns true once the destination is reached.
    fn visit<M: NavigationMap + ?Sized>(
        &self,
        ctx: &mut SearchContext,
        map: &M,
        node: NodeId,
        direction: Vector,
    ) -> bool {
        let (grid, g, parent) = {
            let n = ctx.node(node);
            (n.grid(), n.g(), n.parent())
        };
        let target = grid + direction;
        if target == ctx.destination() {
            let cost = cost_add(g, map.cost(target));
            let terminal = ctx.create_node(target, Some(node), direction, cost);
            ctx.set_terminal(terminal);
            return true;
        }
        if parent.map(|p| ctx.node(p).grid()) == Some(target) || !map.can_cross(target) {
            return false;
        }
        let cost = cost_add(g, map.cost(target));
        if !ctx.update_if_better(target, Some(node), direction, cost) {
            ctx.add_open(target, Some(node), direction, cost);
        }
        false
    }
}

impl Strategy for AStar {
    fn create_first_node(&self, ctx: &mut SearchContext, start: Grid) -> NodeId {
        ctx.create_node(start, None, START, 0)
    }

    fn expand<M: NavigationMap + ?Sized>(&self, ctx: &mut SearchContext, map: &M, node: NodeId) {
        for direction in NEIGHBOURS {
            if self.visit(ctx, map, node, direction) {
                return;
            }
        }
    }
}
