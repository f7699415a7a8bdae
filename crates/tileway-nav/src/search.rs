use core::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::{Cell, Grid, MovementPolicy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-point cost of an orthogonal step.
pub const ORTHO_COST: u32 = 10;
/// Fixed-point cost of a diagonal step (sqrt(2) in tenths).
pub const DIAG_COST: u32 = 14;

/// Outcome of one search. Immutable once returned; owned by the caller.
///
/// "No path" is a negative result (`found == false`, empty `path`), not an
/// error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    /// Cells from start to goal inclusive; empty when no path exists.
    pub path: Vec<Cell>,
    pub found: bool,
    /// Accumulated step cost in fixed-point units ([`ORTHO_COST`] per
    /// orthogonal step, [`DIAG_COST`] per diagonal step).
    pub cost: u32,
    /// Cells finalized (removed from the open set) during the search.
    pub explored: u32,
    /// Wall-clock duration of the search call.
    pub elapsed: Duration,
}

impl PathResult {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    fn not_found(explored: u32, elapsed: Duration) -> Self {
        Self {
            path: Vec::new(),
            found: false,
            cost: 0,
            explored,
            elapsed,
        }
    }
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    h: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    /// Ascending f, then smaller h (prefer nodes nearer the goal on tied
    /// estimates), then insertion order for reproducible results.
    fn key(&self) -> (u32, u32, u64) {
        (self.f, self.h, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

// Fixed neighbor order for determinism: N, E, S, W then NE, SE, SW, NW.
const ORTHO_STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAG_STEPS: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

fn scaled_estimate(policy: MovementPolicy, a: Cell, b: Cell) -> u32 {
    (policy.heuristic.estimate(a, b) * ORTHO_COST as f32).round() as u32
}

fn reconstruct(grid: &Grid, came_from: &[Option<usize>], mut current: usize) -> Vec<Cell> {
    let mut out = vec![grid.cell_from_idx(current)];
    while let Some(prev) = came_from[current] {
        current = prev;
        out.push(grid.cell_from_idx(current));
    }
    out.reverse();
    out
}

/// Best-first search for a minimal-cost walkable route from `start` to
/// `goal` under `policy`.
///
/// A search whose start or goal is non-walkable (including out of bounds)
/// returns `found = false` without exploring; retargeting is the caller's
/// responsibility.
pub fn search(grid: &Grid, policy: MovementPolicy, start: Cell, goal: Cell) -> PathResult {
    let started = Instant::now();

    let (Some(start_idx), Some(goal_idx)) = (grid.idx(start), grid.idx(goal)) else {
        return PathResult::not_found(0, started.elapsed());
    };
    if !grid.is_cell_walkable(start) || !grid.is_cell_walkable(goal) {
        return PathResult::not_found(0, started.elapsed());
    }

    let mut open = BinaryHeap::<OpenNode>::new();
    let mut tie: u64 = 0;
    let mut explored: u32 = 0;

    let mut g_score = vec![u32::MAX; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];

    g_score[start_idx] = 0;
    let h0 = scaled_estimate(policy, start, goal);
    open.push(OpenNode {
        f: h0,
        h: h0,
        g: 0,
        cell: start,
        tie,
    });
    tie += 1;

    while let Some(node) = open.pop() {
        let Some(node_idx) = grid.idx(node.cell) else {
            continue;
        };
        if node.g != g_score[node_idx] {
            // Stale heap entry.
            continue;
        }
        explored += 1;

        if node.cell == goal {
            let path = reconstruct(grid, &came_from, goal_idx);
            return PathResult {
                path,
                found: true,
                cost: node.g,
                explored,
                elapsed: started.elapsed(),
            };
        }

        let mut relax = |dx: i32, dy: i32, step_cost: u32, open: &mut BinaryHeap<OpenNode>| {
            let n = Cell::new(node.cell.x + dx, node.cell.y + dy);
            let Some(n_idx) = grid.idx(n) else {
                return;
            };
            if !grid.is_cell_walkable(n) {
                return;
            }

            let tentative_g = node.g.saturating_add(step_cost);
            if tentative_g >= g_score[n_idx] {
                return;
            }

            came_from[n_idx] = Some(node_idx);
            g_score[n_idx] = tentative_g;
            let h = scaled_estimate(policy, n, goal);
            open.push(OpenNode {
                f: tentative_g.saturating_add(h),
                h,
                g: tentative_g,
                cell: n,
                tie,
            });
            tie += 1;
        };

        for (dx, dy) in ORTHO_STEPS {
            relax(dx, dy, ORTHO_COST, &mut open);
        }

        if policy.allow_diagonals {
            for (dx, dy) in DIAG_STEPS {
                if !policy.cut_corners {
                    // Both flanking orthogonal cells must be open, otherwise
                    // the move would slip through a solid corner.
                    let flank_a = grid.is_walkable(node.cell.x + dx, node.cell.y);
                    let flank_b = grid.is_walkable(node.cell.x, node.cell.y + dy);
                    if !flank_a || !flank_b {
                        continue;
                    }
                }
                relax(dx, dy, DIAG_COST, &mut open);
            }
        }
    }

    PathResult::not_found(explored, started.elapsed())
}
