//! Grid navigation primitives: walkability grids, A* search, smoothing, caching.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cache;
pub mod grid;
pub mod heuristic;
pub mod math;
pub mod pathfinder;
pub mod policy;
pub mod search;
pub mod smooth;

pub use cache::{PathCache, PathKey};
pub use grid::{Cell, Grid};
pub use heuristic::Heuristic;
pub use math::Vec2;
pub use pathfinder::Pathfinder;
pub use policy::MovementPolicy;
pub use search::{search, PathResult, DIAG_COST, ORTHO_COST};
pub use smooth::smooth;
