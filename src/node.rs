use crate::grid::{Grid, Vector};
use crate::map::Cost;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Index of a node in its [NodeTree]. Stable until the tree is cleared.
pub type NodeId = usize;

/// Which search set a node currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Residence {
    /// Created but in neither set, e.g. an intermediate diagonal node or the terminal node.
    Unlisted,
    Open,
    Closed,
}

/// A node of the search tree. The parent link is an index, not ownership, and `children` only
/// exists so that cost changes can be pushed down to dependants.
#[derive(Clone, Debug)]
pub struct PathNode {
    pub(crate) grid: Grid,
    pub(crate) g: Cost,
    pub(crate) parent: Option<NodeId>,
    pub(crate) direction: Vector,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) residence: Residence,
    // JPS bookkeeping, unused by A*.
    pub(crate) jump_point: bool,
    pub(crate) forced: SmallVec<[Vector; 2]>,
    pub(crate) orthogonal_done: bool,
    pub(crate) oblique_done: bool,
}

impl PathNode {
    fn new(grid: Grid, parent: Option<NodeId>, direction: Vector, g: Cost) -> PathNode {
        PathNode {
            grid,
            g,
            parent,
            direction,
            children: SmallVec::new(),
            residence: Residence::Unlisted,
            jump_point: false,
            forced: SmallVec::new(),
            orthogonal_done: false,
            oblique_done: false,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Best known cost from the start.
    pub fn g(&self) -> Cost {
        self.g
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direction from the parent to this node; empty for the start node.
    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn residence(&self) -> Residence {
        self.residence
    }
}

/// All nodes of one search, keyed by cell so that each cell has at most one node.
#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    nodes: FxIndexMap<Grid, PathNode>,
}

impl NodeTree {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn find(&self, grid: &Grid) -> Option<NodeId> {
        self.nodes.get_index_of(grid)
    }

    /// Creates the node for `grid` as a child of `parent`. A cell that already holds an unlisted
    /// node has that slot recycled; listed nodes must be updated in place instead.
    pub fn insert(
        &mut self,
        grid: Grid,
        parent: Option<NodeId>,
        direction: Vector,
        g: Cost,
    ) -> NodeId {
        let id = match self.find(&grid) {
            Some(id) => {
                debug_assert_eq!(self.nodes[id].residence, Residence::Unlisted);
                self.detach(id);
                self.nodes[id] = PathNode::new(grid, None, direction, g);
                id
            }
            None => self
                .nodes
                .insert_full(grid, PathNode::new(grid, None, direction, g))
                .0,
        };
        self.attach(id, parent);
        id
    }

    fn attach(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id].parent = parent;
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
    }

    /// Removes the node from its parent's children and clears the parent link.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(p) = self.nodes[id].parent.take() {
            self.nodes[p].children.retain(|c| *c != id);
        }
    }

    /// Moves the node under `parent`, updating both child lists. Costs are left untouched.
    pub fn reparent(&mut self, id: NodeId, parent: Option<NodeId>, direction: Vector) {
        self.detach(id);
        self.attach(id, parent);
        self.nodes[id].direction = direction;
    }

    /// Sets the cost of a node and shifts every descendant by the same amount, never below zero.
    /// `on_change` sees each node whose cost actually changed.
    pub fn update_cost<F>(&mut self, id: NodeId, g: Cost, mut on_change: F)
    where
        F: FnMut(NodeId, &PathNode),
    {
        let mut stack: Vec<(NodeId, Cost)> = vec![(id, g)];
        while let Some((id, g)) = stack.pop() {
            let node = &mut self.nodes[id];
            let delta = g as i64 - node.g as i64;
            if delta == 0 {
                continue;
            }
            node.g = g;
            on_change(id, node);
            for &child in &self.nodes[id].children {
                let child_g = (self.nodes[child].g as i64 + delta).max(0) as Cost;
                stack.push((child, child_g));
            }
        }
    }
}

impl Index<NodeId> for NodeTree {
    type Output = PathNode;

    fn index(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for NodeTree {
    fn index_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id]
    }
}
