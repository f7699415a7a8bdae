use crate::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance estimator used to order search expansion.
///
/// Admissibility is the caller's concern: Manhattan suits 4-directional
/// movement, Chebyshev/Euclidean suit diagonal movement. A mismatched
/// heuristic degrades path optimality, not correctness.
///
/// Function pointers compare and hash by address, so a policy carrying a
/// `Custom` heuristic still keys the path cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    Chebyshev,
    /// User-supplied estimator in cell units; negative returns are clamped.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(fn(Cell, Cell) -> f32),
}

impl Heuristic {
    /// Estimated remaining distance from `a` to `b` in cell units.
    pub fn estimate(self, a: Cell, b: Cell) -> f32 {
        let dx = (a.x - b.x).abs() as f32;
        let dy = (a.y - b.y).abs() as f32;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Chebyshev => dx.max(dy),
            Heuristic::Custom(f) => f(a, b).max(0.0),
        }
    }
}
