use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of the cell in continuous cell units.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// Cell containing a continuous position.
    pub fn from_position(p: Vec2) -> Self {
        Self {
            x: p.x.floor() as i32,
            y: p.y.floor() as i32,
        }
    }
}

/// Dense walkability map over integer coordinates.
///
/// Out-of-bounds cells read as non-walkable (the exterior is solid) and
/// out-of-bounds writes are rejected. Every accepted mutation bumps the
/// version counter, which tags search results and cache entries.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    width: i32,
    height: i32,
    walkable: Vec<bool>,
    version: u64,
}

impl Grid {
    /// All cells start walkable.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        let width = width as i32;
        let height = height as i32;
        Self {
            width,
            height,
            walkable: vec![true; (width * height) as usize],
            version: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns whether the write was applied. Out-of-bounds writes are
    /// rejected and do not bump the version.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) -> bool {
        let Some(idx) = self.idx(Cell { x, y }) else {
            return false;
        };
        self.walkable[idx] = walkable;
        self.version += 1;
        true
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.idx(Cell { x, y })
            .map(|idx| self.walkable[idx])
            .unwrap_or(false)
    }

    pub fn is_cell_walkable(&self, cell: Cell) -> bool {
        self.is_walkable(cell.x, cell.y)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub(crate) fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    pub(crate) fn cell_from_idx(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell {
            x: idx % self.width,
            y: idx / self.width,
        }
    }

    pub(crate) fn len(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Used when a pathfinder swaps grids: the replacement's version must
    /// land past the old grid's so stale cache keys can never collide.
    pub(crate) fn ensure_version_above(&mut self, floor: u64) {
        if self.version <= floor {
            self.version = floor + 1;
        }
    }

    /// Walkable cells in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.walkable
            .iter()
            .enumerate()
            .filter(|(_, w)| **w)
            .map(|(i, _)| self.cell_from_idx(i))
    }

    /// True iff every cell intersected by the segment from `a` to `b` is
    /// walkable (Bresenham traversal, endpoints included).
    pub fn line_of_sight(&self, a: Cell, b: Cell) -> bool {
        let mut x = a.x;
        let mut y = a.y;
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if !self.is_walkable(x, y) {
                return false;
            }
            if x == b.x && y == b.y {
                return true;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}
