use core::fmt;

use tileway_core::{Blackboard, EntityId};
use tileway_nav::{Cell, Vec2};

use crate::behavior::StateName;

/// Tag binding an entity to its behavior definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKind(pub &'static str);

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A live agent. Positions are in continuous cell units; `cell()` gives the
/// occupied grid cell.
///
/// Mutated by the movement integrator and by behavior callbacks during the
/// update pass; external callers may read snapshots between ticks.
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub target: Option<Vec2>,
    /// Cells per second.
    pub speed: f32,
    pub state: StateName,
    pub is_moving: bool,
    pub path: Option<Vec<Cell>>,
    pub path_index: usize,
    /// Host-defined render position; never touched by the core.
    pub pixel_position: Option<Vec2>,
    pub group: Option<u32>,
    /// State-local scratch storage.
    pub data: Blackboard,
}

impl Entity {
    pub(crate) fn from_spec(spec: EntitySpec, initial: StateName) -> Self {
        Self {
            id: spec.id,
            kind: spec.kind,
            position: spec.position,
            target: spec.target,
            speed: spec.speed,
            state: initial,
            is_moving: false,
            path: None,
            path_index: 0,
            pixel_position: None,
            group: spec.group,
            data: Blackboard::new(),
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::from_position(self.position)
    }

    /// Hands the entity a path to follow; the movement integrator picks it
    /// up on the next pass.
    pub fn assign_path(&mut self, path: Vec<Cell>) {
        self.path = Some(path);
        self.path_index = 0;
        self.is_moving = true;
    }

    pub fn stop(&mut self) {
        self.path = None;
        self.path_index = 0;
        self.is_moving = false;
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("is_moving", &self.is_moving)
            .finish_non_exhaustive()
    }
}

/// Creation parameters for [`EntityController::spawn`](crate::EntityController::spawn).
#[derive(Debug, Clone, Copy)]
pub struct EntitySpec {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub speed: f32,
    pub target: Option<Vec2>,
    pub group: Option<u32>,
}

impl EntitySpec {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            speed: 1.0,
            target: None,
            group: None,
        }
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn target(mut self, target: Vec2) -> Self {
        self.target = Some(target);
        self
    }

    pub fn group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }
}

/// Read-only snapshot of an entity, taken at tick start for in-callback
/// queries and returned by the controller's spatial query surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub state: StateName,
}
