//! Deterministic, engine-agnostic kernel primitives for tile-based agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod id;
pub mod rng;
pub mod tick;

pub use blackboard::{BbKey, Blackboard};
pub use id::EntityId;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
