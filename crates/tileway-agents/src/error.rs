use thiserror::Error;

use tileway_core::EntityId;

use crate::behavior::StateName;
use crate::entity::EntityKind;

/// Behavior-wiring mistakes, surfaced synchronously to the caller.
///
/// "No path" and "no walkable cell" are negative results on the query
/// surfaces, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no behavior registered for entity kind '{kind}'")]
    UnknownKind { kind: EntityKind },

    #[error("entity id {id} already exists")]
    DuplicateEntity { id: EntityId },

    #[error("behavior for entity kind '{kind}' is already registered")]
    DuplicateBehavior { kind: EntityKind },

    #[error("unknown entity id {id}")]
    UnknownEntity { id: EntityId },

    #[error("state '{state}' is not defined for entity kind '{kind}'")]
    UnknownState { state: StateName, kind: EntityKind },

    #[error("initial state '{state}' is not defined for entity kind '{kind}'")]
    MissingInitialState { state: StateName, kind: EntityKind },
}
