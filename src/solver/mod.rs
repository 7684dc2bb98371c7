use crate::error::SearchError;
use crate::grid::{Grid, Vector, START};
use crate::map::{Cost, NavigationMap};
use crate::node::NodeId;
use crate::search::{Heuristic, SearchContext};
use log::{debug, info, trace, warn};

pub mod astar;
pub mod jps;

use astar::AStar;
use jps::Jps;

/// A point on a found path. For A* every waypoint is one step from the previous one, for JPS
/// consecutive waypoints lie on a straight or diagonal line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Waypoint {
    pub grid: Grid,
    /// Direction from the previous waypoint, empty for the first one.
    pub direction: Vector,
    /// Cumulative cost from the start.
    pub cost: Cost,
}

/// The part of a search that differs between algorithms: how the first node is made and how a
/// popped node generates successors. Everything else lives in [PathFinder].
pub trait Strategy {
    /// Creates the start node. It is inserted into the open set by the caller.
    fn create_first_node(&self, ctx: &mut SearchContext, start: Grid) -> NodeId;

    /// Expands a node that was just popped from the open set. Successors are added through
    /// `ctx`; reaching the destination is reported with [SearchContext::set_terminal].
    fn expand<M: NavigationMap + ?Sized>(&self, ctx: &mut SearchContext, map: &M, node: NodeId);

    fn heuristic(&self) -> Heuristic {
        Heuristic::Manhattan
    }
}

#[derive(Clone, Debug, Default)]
pub struct FinderConfig {
    /// Gives up after this many expansions. `None` searches until the open set is empty.
    pub max_expansions: Option<usize>,
}

/// Counters of the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the open set and expanded.
    pub expanded: usize,
    /// Nodes created, including intermediate ones.
    pub created: usize,
}

/// Runs best-first searches with a [Strategy]. A finder keeps the state of its last search
/// around until [reset](PathFinder::reset) is called, so it cannot be reused without one.
pub struct PathFinder<S: Strategy> {
    pub strategy: S,
    pub config: FinderConfig,
    context: SearchContext,
    stats: SearchStats,
    dirty: bool,
}

pub type AStarFinder = PathFinder<AStar>;
pub type JpsFinder = PathFinder<Jps>;

impl<S: Strategy + Default> Default for PathFinder<S> {
    fn default() -> PathFinder<S> {
        PathFinder::new(S::default())
    }
}

impl<S: Strategy> PathFinder<S> {
    pub fn new(strategy: S) -> PathFinder<S> {
        PathFinder::with_config(strategy, FinderConfig::default())
    }

    pub fn with_config(strategy: S, config: FinderConfig) -> PathFinder<S> {
        PathFinder {
            strategy,
            config,
            context: SearchContext::default(),
            stats: SearchStats::default(),
            dirty: false,
        }
    }

    /// Clears all nodes, the open set and the statistics of the previous search.
    pub fn reset(&mut self) {
        self.context.clear();
        self.stats = SearchStats::default();
        self.dirty = false;
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches a path from `start` to `destination`. Returns `Ok(None)` if either end is not
    /// traversable or no path was found, and the waypoints from start to destination otherwise.
    pub fn find_path<M: NavigationMap + ?Sized>(
        &mut self,
        map: &M,
        start: Grid,
        destination: Grid,
    ) -> Result<Option<Vec<Waypoint>>, SearchError> {
        if self.dirty {
            return Err(SearchError::NotReset);
        }
        if !map.can_cross(start) {
            info!("Start {} is not traversable", start);
            return Ok(None);
        }
        if !map.can_cross(destination) {
            info!("Destination {} is not traversable", destination);
            return Ok(None);
        }
        if start == destination {
            return Ok(Some(vec![Waypoint {
                grid: start,
                direction: START,
                cost: 0,
            }]));
        }
        if !map.connected(start, destination) {
            info!("{} and {} are not connected", start, destination);
            return Ok(None);
        }

        self.dirty = true;
        debug!("Searching path from {} to {}", start, destination);
        self.context
            .begin(destination, map.min_cost(), self.strategy.heuristic());
        let first = self.strategy.create_first_node(&mut self.context, start);
        self.context.push_open(first);

        loop {
            if let Some(limit) = self.config.max_expansions {
                if self.stats.expanded >= limit {
                    warn!("Expansion budget of {} exhausted", limit);
                    break;
                }
            }
            let Some(node) = self.context.pop() else {
                break;
            };
            self.stats.expanded += 1;
            trace!("Expanding {}", self.context.node(node).grid());
            self.strategy.expand(&mut self.context, map, node);
            if self.context.terminal().is_some() {
                break;
            }
        }
        self.stats.created = self.context.len();

        let path = self.context.reconstruct();
        match &path {
            Some(waypoints) => debug!(
                "Found path with {} waypoints and cost {} after {} expansions",
                waypoints.len(),
                path_cost(waypoints),
                self.stats.expanded
            ),
            None => debug!(
                "No path from {} to {} after {} expansions",
                start, destination, self.stats.expanded
            ),
        }
        Ok(path)
    }
}

/// Total cost of a path, i.e. the cumulative cost of its last waypoint.
pub fn path_cost(waypoints: &[Waypoint]) -> Cost {
    waypoints.last().map_or(0, |w| w.cost)
}
