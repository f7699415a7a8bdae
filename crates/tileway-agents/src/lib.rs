//! Entity store, per-kind FSM behavior driver, movement integration, and
//! spatial queries, built atop `tileway-nav`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod controller;
pub mod entity;
pub mod error;
pub mod movement;
pub mod queries;

pub use behavior::{Behavior, BehaviorCtx, State, StateName, Transition};
pub use controller::{EntityController, ListenerId};
pub use entity::{Entity, EntityKind, EntitySpec, EntityView};
pub use error::ConfigError;

pub use tileway_core::{BbKey, Blackboard, EntityId};
