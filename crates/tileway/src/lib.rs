//! Umbrella crate that re-exports the `tileway-*` building blocks.
//!
//! Grid-based path computation and autonomous-agent behavior orchestration
//! for tile-based 2D worlds.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use tileway_core as core;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use tileway_nav as nav;

#[cfg(feature = "agents")]
#[cfg_attr(docsrs, doc(cfg(feature = "agents")))]
pub use tileway_agents as agents;
