//! Spatial queries over entity views and walkability grids.

use tileway_core::DeterministicRng;
use tileway_nav::{Cell, Grid, Vec2};

use crate::entity::{EntityKind, EntityView};

/// All views within Euclidean `radius` of `pos`, optionally filtered by
/// kind. Order follows the input slice (spawn order), no duplicates.
pub fn within_radius<'a>(
    views: &'a [EntityView],
    pos: Vec2,
    radius: f32,
    filter: Option<EntityKind>,
) -> Vec<&'a EntityView> {
    let r2 = radius * radius;
    views
        .iter()
        .filter(|v| filter.map_or(true, |k| v.kind == k))
        .filter(|v| (v.position - pos).length_squared() <= r2)
        .collect()
}

/// Minimum-distance view; ties resolve to the earliest spawned (the slice
/// is in spawn order and only strictly closer candidates replace the best).
pub fn nearest<'a>(
    views: &'a [EntityView],
    pos: Vec2,
    filter: Option<EntityKind>,
) -> Option<&'a EntityView> {
    let mut best: Option<(&EntityView, f32)> = None;
    for view in views.iter().filter(|v| filter.map_or(true, |k| v.kind == k)) {
        let d = (view.position - pos).length_squared();
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((view, d)),
        }
    }
    best.map(|(view, _)| view)
}

/// Uniform pick over all walkable cells; `None` on a fully blocked grid.
pub fn random_walkable(grid: &Grid, rng: &mut impl DeterministicRng) -> Option<Cell> {
    let total = grid.walkable_cells().count();
    if total == 0 {
        return None;
    }
    let n = rng.next_range_u32(total as u32) as usize;
    grid.walkable_cells().nth(n)
}

/// Uniform pick over walkable cells within Euclidean `radius` of `anchor`.
pub fn random_walkable_near(
    grid: &Grid,
    rng: &mut impl DeterministicRng,
    anchor: Cell,
    radius: i32,
) -> Option<Cell> {
    let r2 = radius * radius;
    let mut candidates = Vec::new();
    for y in (anchor.y - radius)..=(anchor.y + radius) {
        for x in (anchor.x - radius)..=(anchor.x + radius) {
            let dx = x - anchor.x;
            let dy = y - anchor.y;
            if dx * dx + dy * dy <= r2 && grid.is_walkable(x, y) {
                candidates.push(Cell::new(x, y));
            }
        }
    }
    if candidates.is_empty() {
        return None;
    }
    let n = rng.next_range_u32(candidates.len() as u32) as usize;
    Some(candidates[n])
}

/// The cell itself if walkable, else the first walkable cell found on
/// expanding Chebyshev rings up to `radius`, scanned in row-major order
/// for determinism. `None` when the whole search is exhausted.
pub fn walkable_near(grid: &Grid, cell: Cell, radius: i32) -> Option<Cell> {
    if grid.is_cell_walkable(cell) {
        return Some(cell);
    }
    for r in 1..=radius.max(0) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs().max(dy.abs()) != r {
                    continue;
                }
                let candidate = Cell::new(cell.x + dx, cell.y + dy);
                if grid.is_cell_walkable(candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}
