//! The search state shared by all strategies: the node tree, the open set as a binary heap and
//! the terminal node once the destination has been reached.
use crate::grid::{Grid, Vector};
use crate::map::{cost_add, Cost};
use crate::node::{NodeId, NodeTree, PathNode, Residence};
use crate::solver::Waypoint;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Lower bound on the remaining cost, scaled by the cheapest cell of the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Admissible when every move is orthogonal, or a diagonal costs at least two cells.
    #[default]
    Manhattan,
    /// Admissible when a diagonal step costs a single cell.
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(&self, from: &Grid, to: &Grid, min_cost: Cost) -> Cost {
        let distance = match self {
            Heuristic::Manhattan => from.manhattan_distance(to),
            Heuristic::Chebyshev => from.chebyshev_distance(to),
        };
        distance.saturating_mul(min_cost)
    }
}

/// Outcome of [SearchContext::offer].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// The cell has no node in the open or the closed set.
    Absent,
    /// The listed node is at least as cheap and was left alone.
    Kept(NodeId),
    /// The listed node now hangs under the offered parent with the lower cost.
    Improved(NodeId),
}

struct SmallestCostHolder {
    estimated_cost: Cost,
    cost: Cost,
    index: NodeId,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimate first, then the deepest node, then the oldest node.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Node storage and open set of a single search. Strategies create and update nodes through
/// this type; the main loop in [PathFinder](crate::solver::PathFinder) pops from it.
///
/// The heap may hold stale entries for nodes that were closed or improved after being pushed.
/// An entry is live only while its node is open with exactly the entry's cost, which is unique
/// because costs only ever decrease.
#[derive(Default)]
pub struct SearchContext {
    nodes: NodeTree,
    open: BinaryHeap<SmallestCostHolder>,
    terminal: Option<NodeId>,
    destination: Grid,
    min_cost: Cost,
    heuristic: Heuristic,
}

impl SearchContext {
    /// Prepares an empty context for a search towards `destination`.
    pub fn begin(&mut self, destination: Grid, min_cost: Cost, heuristic: Heuristic) {
        self.clear();
        self.destination = destination;
        self.min_cost = min_cost;
        self.heuristic = heuristic;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.terminal = None;
    }

    pub fn destination(&self) -> Grid {
        self.destination
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id]
    }

    /// The node of `grid` if it is in the open or the closed set.
    pub fn find_listed(&self, grid: &Grid) -> Option<NodeId> {
        self.nodes
            .find(grid)
            .filter(|id| self.nodes[*id].residence != Residence::Unlisted)
    }

    /// Creates a node that belongs to neither set.
    pub fn create_node(
        &mut self,
        grid: Grid,
        parent: Option<NodeId>,
        direction: Vector,
        g: Cost,
    ) -> NodeId {
        self.nodes.insert(grid, parent, direction, g)
    }

    /// Creates a node and inserts it into the open set.
    pub fn add_open(
        &mut self,
        grid: Grid,
        parent: Option<NodeId>,
        direction: Vector,
        g: Cost,
    ) -> NodeId {
        let id = self.create_node(grid, parent, direction, g);
        self.push_open(id);
        id
    }

    /// Moves an existing node into the open set. Returns `false` if it was already open.
    pub fn push_open(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id];
        if node.residence == Residence::Open {
            return false;
        }
        node.residence = Residence::Open;
        let holder = self.holder(id);
        self.open.push(holder);
        true
    }

    fn holder(&self, id: NodeId) -> SmallestCostHolder {
        let node = &self.nodes[id];
        let h = self
            .heuristic
            .estimate(&node.grid, &self.destination, self.min_cost);
        SmallestCostHolder {
            estimated_cost: cost_add(node.g, h),
            cost: node.g,
            index: id,
        }
    }

    /// Pops the open node with the smallest estimated total cost and closes it.
    pub fn pop(&mut self) -> Option<NodeId> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.open.pop() {
            let node = &mut self.nodes[index];
            if node.residence != Residence::Open || node.g != cost {
                continue;
            }
            node.residence = Residence::Closed;
            return Some(index);
        }
        None
    }

    /// Offers a new route to `grid`. If the cell has a listed node and `cost` is strictly lower,
    /// the node is moved under `parent` and the cost change is pushed down to its descendants.
    pub fn offer(
        &mut self,
        grid: Grid,
        parent: Option<NodeId>,
        direction: Vector,
        cost: Cost,
    ) -> Offer {
        let Some(id) = self.find_listed(&grid) else {
            return Offer::Absent;
        };
        if cost < self.nodes[id].g {
            self.nodes.reparent(id, parent, direction);
            self.update_cost(id, cost);
            Offer::Improved(id)
        } else {
            Offer::Kept(id)
        }
    }

    /// Like [offer](Self::offer), returning whether a listed node existed regardless of whether
    /// it was improved.
    pub fn update_if_better(
        &mut self,
        grid: Grid,
        parent: Option<NodeId>,
        direction: Vector,
        cost: Cost,
    ) -> bool {
        self.offer(grid, parent, direction, cost) != Offer::Absent
    }

    fn update_cost(&mut self, id: NodeId, g: Cost) {
        let mut reopened: Vec<NodeId> = Vec::new();
        self.nodes.update_cost(id, g, |id, node| {
            if node.residence == Residence::Open {
                reopened.push(id);
            }
        });
        for id in reopened {
            let holder = self.holder(id);
            self.open.push(holder);
        }
    }

    /// Drops a node that turned out to be useless from its parent's children.
    pub fn discard(&mut self, id: NodeId) {
        self.nodes.detach(id);
    }

    pub fn set_terminal(&mut self, id: NodeId) {
        self.terminal = Some(id);
    }

    /// The node that reached the destination, if any.
    pub fn terminal(&self) -> Option<NodeId> {
        self.terminal
    }

    /// Follows the parent links from the terminal node back to the start.
    pub fn reconstruct(&self) -> Option<Vec<Waypoint>> {
        let terminal = self.terminal?;
        let mut path: Vec<Waypoint> =
            std::iter::successors(Some(terminal), |id| self.nodes[*id].parent)
                .map(|id| {
                    let node = &self.nodes[id];
                    Waypoint {
                        grid: node.grid,
                        direction: node.direction,
                        cost: node.g,
                    }
                })
                .collect();
        path.reverse();
        Some(path)
    }
}
