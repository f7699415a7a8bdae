use tracing::{debug, trace};

use crate::{search, smooth, Cell, Grid, MovementPolicy, PathCache, PathKey, PathResult};

/// Owns a grid and a movement policy; runs the search -> smooth -> cache
/// pipeline.
#[derive(Debug)]
pub struct Pathfinder {
    grid: Grid,
    policy: MovementPolicy,
    cache: Option<PathCache>,
}

impl Pathfinder {
    pub fn new(grid: Grid, policy: MovementPolicy) -> Self {
        Self {
            grid,
            policy,
            cache: None,
        }
    }

    pub fn with_cache(grid: Grid, policy: MovementPolicy, capacity: usize) -> Self {
        Self {
            grid,
            policy,
            cache: Some(PathCache::new(capacity)),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutations through this handle bump the grid version, which changes
    /// every cache key; no explicit invalidation is needed.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn policy(&self) -> MovementPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MovementPolicy) {
        self.policy = policy;
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }

    /// Wholesale grid replacement when the host world changes structurally.
    pub fn set_grid(&mut self, mut grid: Grid) {
        grid.ensure_version_above(self.grid.version());
        self.grid = grid;
    }

    pub fn find_path(
        &mut self,
        start_x: i32,
        start_y: i32,
        goal_x: i32,
        goal_y: i32,
        smooth: bool,
    ) -> PathResult {
        self.find_path_cells(Cell::new(start_x, start_y), Cell::new(goal_x, goal_y), smooth)
    }

    pub fn find_path_cells(&mut self, start: Cell, goal: Cell, smoothed: bool) -> PathResult {
        let key = PathKey {
            start,
            goal,
            policy: self.policy,
            grid_version: self.grid.version(),
            smoothed,
        };

        if let Some(cache) = &mut self.cache {
            if let Some(hit) = cache.lookup(&key) {
                trace!(?start, ?goal, "path cache hit");
                return hit;
            }
        }

        let mut result = search(&self.grid, self.policy, start, goal);
        if smoothed && result.found {
            result.path = smooth::smooth(&self.grid, &result.path);
        }

        debug!(
            ?start,
            ?goal,
            found = result.found,
            cost = result.cost,
            explored = result.explored,
            elapsed_us = result.elapsed.as_micros() as u64,
            "path search"
        );

        if let Some(cache) = &mut self.cache {
            cache.store(key, result.clone());
        }
        result
    }
}
