use crate::Heuristic;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable movement rules for a search.
///
/// Attached to a [`Pathfinder`](crate::Pathfinder); part of the cache key,
/// so changing it can never serve a path computed under different rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovementPolicy {
    pub allow_diagonals: bool,
    /// Whether a diagonal step may pass between two orthogonally-adjacent
    /// blocked cells.
    pub cut_corners: bool,
    pub heuristic: Heuristic,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self {
            allow_diagonals: false,
            cut_corners: false,
            heuristic: Heuristic::Manhattan,
        }
    }
}

impl MovementPolicy {
    /// 4-directional movement with a Manhattan estimate.
    pub fn orthogonal() -> Self {
        Self::default()
    }

    /// 8-directional movement with a Chebyshev estimate and no corner cuts.
    pub fn diagonal() -> Self {
        Self {
            allow_diagonals: true,
            cut_corners: false,
            heuristic: Heuristic::Chebyshev,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_corner_cutting(mut self, cut_corners: bool) -> Self {
        self.cut_corners = cut_corners;
        self
    }
}
