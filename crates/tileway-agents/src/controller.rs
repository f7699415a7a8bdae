use std::collections::BTreeMap;

use tracing::debug;

use tileway_core::{rng, EntityId, SplitMix64, TickContext};
use tileway_nav::{Cell, Pathfinder, Vec2};

use crate::behavior::{Behavior, BehaviorCtx, StateName, Transition};
use crate::entity::{Entity, EntityKind, EntitySpec, EntityView};
use crate::error::ConfigError;
use crate::{movement, queries};

// Seed streams, so behavior randomness and query randomness never alias.
const STREAM_BEHAVIOR: u64 = 1;
const STREAM_QUERIES: u64 = 2;

/// Opaque token for removing a state-change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type StateChangeFn = Box<dyn FnMut(EntityId, StateName, StateName)>;

struct EntityRecord {
    entity: Entity,
    /// Elapsed seconds since the last FSM evaluation.
    timer: f32,
}

/// Drives one finite-state machine per entity and integrates movement, in a
/// single-threaded tick with deterministic (spawn) order.
///
/// Invariant: every live entity's `state` names a key in its kind's behavior
/// state map, established at spawn and preserved by transition validation.
pub struct EntityController {
    pathfinder: Pathfinder,
    behaviors: BTreeMap<EntityKind, Behavior>,
    entities: BTreeMap<EntityId, EntityRecord>,
    /// Spawn order; drives FSM and movement pass ordering.
    order: Vec<EntityId>,
    listeners: Vec<(ListenerId, StateChangeFn)>,
    next_listener: u64,
    tick: u64,
    seed: u64,
    query_rng: SplitMix64,
    smooth_paths: bool,
}

impl EntityController {
    pub fn new(pathfinder: Pathfinder, seed: u64) -> Self {
        Self {
            pathfinder,
            behaviors: BTreeMap::new(),
            entities: BTreeMap::new(),
            order: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            tick: 0,
            seed,
            query_rng: SplitMix64::new(rng::derive_seed(seed, 0, STREAM_QUERIES)),
            smooth_paths: false,
        }
    }

    /// Route paths requested by behavior callbacks through the smoother.
    pub fn with_smoothing(mut self, smooth_paths: bool) -> Self {
        self.smooth_paths = smooth_paths;
        self
    }

    pub fn register_behavior(&mut self, kind: EntityKind, behavior: Behavior) -> Result<(), ConfigError> {
        if self.behaviors.contains_key(&kind) {
            return Err(ConfigError::DuplicateBehavior { kind });
        }
        if !behavior.has_state(behavior.initial()) {
            return Err(ConfigError::MissingInitialState {
                state: behavior.initial(),
                kind,
            });
        }
        self.behaviors.insert(kind, behavior);
        Ok(())
    }

    /// Creates an entity and enters its kind's initial state synchronously.
    ///
    /// Fails before any state is entered when the kind has no registered
    /// behavior or the id is already live.
    pub fn spawn(&mut self, spec: EntitySpec) -> Result<EntityId, ConfigError> {
        if self.entities.contains_key(&spec.id) {
            return Err(ConfigError::DuplicateEntity { id: spec.id });
        }
        let kind = spec.kind;
        let Some(mut behavior) = self.behaviors.remove(&kind) else {
            return Err(ConfigError::UnknownKind { kind });
        };

        let id = spec.id;
        let initial = behavior.initial();
        let mut entity = Entity::from_spec(spec, initial);

        let views = self.snapshot();
        let ctx_rng = self.tick_context(0.0).rng_for_entity(id, STREAM_BEHAVIOR);
        {
            let mut ctx = BehaviorCtx::new(&mut self.pathfinder, &views, ctx_rng, self.smooth_paths);
            behavior.run_enter(initial, &mut entity, &mut ctx);
        }

        self.behaviors.insert(kind, behavior);
        self.entities.insert(id, EntityRecord { entity, timer: 0.0 });
        self.order.push(id);
        debug!(%id, %kind, state = initial, "entity spawned");
        Ok(id)
    }

    /// Removes an entity and returns it. Destruction is not a transition;
    /// no exit hook runs.
    pub fn despawn(&mut self, id: EntityId) -> Result<Entity, ConfigError> {
        let Some(record) = self.entities.remove(&id) else {
            return Err(ConfigError::UnknownEntity { id });
        };
        self.order.retain(|other| *other != id);
        debug!(%id, "entity despawned");
        Ok(record.entity)
    }

    /// Advances every entity FSM and then movement, in spawn order.
    ///
    /// A callback returning an unknown state name aborts the pass with
    /// [`ConfigError::UnknownState`]; the offending entity stays in its old
    /// state.
    pub fn update(&mut self, dt: f32) -> Result<(), ConfigError> {
        let ctx_tick = self.tick_context(dt);
        self.tick += 1;

        let views = self.snapshot();
        let order = self.order.clone();

        for id in &order {
            self.step_entity(*id, dt, &ctx_tick, &views)?;
        }
        for id in &order {
            if let Some(record) = self.entities.get_mut(id) {
                movement::advance(&mut record.entity, dt);
            }
        }
        Ok(())
    }

    fn step_entity(
        &mut self,
        id: EntityId,
        dt: f32,
        ctx_tick: &TickContext,
        views: &[EntityView],
    ) -> Result<(), ConfigError> {
        let Some(mut record) = self.entities.remove(&id) else {
            return Ok(());
        };
        let kind = record.entity.kind;
        let Some(mut behavior) = self.behaviors.remove(&kind) else {
            self.entities.insert(id, record);
            return Err(ConfigError::UnknownKind { kind });
        };

        record.timer += dt;
        let mut outcome = Ok(());
        let mut transition: Option<(StateName, StateName)> = None;

        let interval = behavior.update_interval();
        if record.timer >= interval {
            let elapsed = record.timer;
            // Subtract only the consumed interval so fractional carry-over
            // survives low update rates. Zero-interval behaviors evaluate
            // every tick and reset fully.
            if interval > 0.0 {
                record.timer -= interval;
            } else {
                record.timer = 0.0;
            }

            let my_views: Vec<EntityView> = views.iter().filter(|v| v.id != id).copied().collect();
            let current = record.entity.state;
            let ctx_rng = ctx_tick.rng_for_entity(id, STREAM_BEHAVIOR);
            let mut ctx = BehaviorCtx::new(&mut self.pathfinder, &my_views, ctx_rng, self.smooth_paths);

            match behavior.run_update(current, &mut record.entity, elapsed, &mut ctx) {
                None => {
                    outcome = Err(ConfigError::UnknownState { state: current, kind });
                }
                Some(Transition::Remain) => {}
                Some(Transition::To(next)) if next == current => {}
                Some(Transition::To(next)) => {
                    if behavior.has_state(next) {
                        behavior.run_exit(current, &mut record.entity, &mut ctx);
                        record.entity.state = next;
                        behavior.run_enter(next, &mut record.entity, &mut ctx);
                        transition = Some((current, next));
                    } else {
                        outcome = Err(ConfigError::UnknownState { state: next, kind });
                    }
                }
            }
        }

        self.entities.insert(id, record);
        self.behaviors.insert(kind, behavior);

        if let Some((old, new)) = transition {
            debug!(%id, %kind, from = old, to = new, "state transition");
            self.notify(id, old, new);
        }
        outcome
    }

    /// Manual state override: bypasses the normal transition triggers but
    /// still runs exit/enter hooks and fires listeners. Overriding to the
    /// current state is a no-op.
    pub fn change_state(&mut self, id: EntityId, next: StateName) -> Result<(), ConfigError> {
        let Some(mut record) = self.entities.remove(&id) else {
            return Err(ConfigError::UnknownEntity { id });
        };
        let kind = record.entity.kind;
        let Some(mut behavior) = self.behaviors.remove(&kind) else {
            self.entities.insert(id, record);
            return Err(ConfigError::UnknownKind { kind });
        };
        if !behavior.has_state(next) {
            self.behaviors.insert(kind, behavior);
            self.entities.insert(id, record);
            return Err(ConfigError::UnknownState { state: next, kind });
        }

        let current = record.entity.state;
        if next != current {
            let views = self.snapshot();
            let ctx_rng = self.tick_context(0.0).rng_for_entity(id, STREAM_BEHAVIOR);
            {
                let mut ctx = BehaviorCtx::new(&mut self.pathfinder, &views, ctx_rng, self.smooth_paths);
                behavior.run_exit(current, &mut record.entity, &mut ctx);
                record.entity.state = next;
                behavior.run_enter(next, &mut record.entity, &mut ctx);
            }
            debug!(%id, %kind, from = current, to = next, "manual state change");
        }

        self.entities.insert(id, record);
        self.behaviors.insert(kind, behavior);
        if next != current {
            self.notify(id, current, next);
        }
        Ok(())
    }

    pub fn set_target(&mut self, id: EntityId, target: Vec2) -> Result<(), ConfigError> {
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(ConfigError::UnknownEntity { id })?;
        record.entity.target = Some(target);
        Ok(())
    }

    pub fn state_of(&self, id: EntityId) -> Option<StateName> {
        self.entities.get(&id).map(|r| r.entity.state)
    }

    pub fn states(&self) -> BTreeMap<EntityId, StateName> {
        self.entities
            .iter()
            .map(|(id, record)| (*id, record.entity.state))
            .collect()
    }

    pub fn is_in_state(&self, id: EntityId, name: StateName) -> bool {
        self.state_of(id) == Some(name)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).map(|r| &r.entity)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).map(|r| &mut r.entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    // --- listener registry -------------------------------------------------

    pub fn on_state_change(
        &mut self,
        listener: impl FnMut(EntityId, StateName, StateName) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was actually removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, id: EntityId, old: StateName, new: StateName) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(id, old, new);
        }
    }

    // --- spatial query surface --------------------------------------------

    pub fn find_entities_near(
        &self,
        pos: Vec2,
        radius: f32,
        filter: Option<EntityKind>,
    ) -> Vec<EntityView> {
        let views = self.snapshot();
        queries::within_radius(&views, pos, radius, filter)
            .into_iter()
            .copied()
            .collect()
    }

    pub fn find_nearest_entity(&self, pos: Vec2, filter: Option<EntityKind>) -> Option<EntityView> {
        let views = self.snapshot();
        queries::nearest(&views, pos, filter).copied()
    }

    pub fn has_line_of_sight(&self, a: Cell, b: Cell) -> bool {
        self.pathfinder.grid().line_of_sight(a, b)
    }

    pub fn find_random_walkable_position(&mut self) -> Option<Cell> {
        queries::random_walkable(self.pathfinder.grid(), &mut self.query_rng)
    }

    pub fn find_random_walkable_near(&mut self, anchor: Cell, radius: i32) -> Option<Cell> {
        queries::random_walkable_near(self.pathfinder.grid(), &mut self.query_rng, anchor, radius)
    }

    pub fn find_walkable_position_near(&self, cell: Cell, radius: i32) -> Option<Cell> {
        queries::walkable_near(self.pathfinder.grid(), cell, radius)
    }

    // ----------------------------------------------------------------------

    fn tick_context(&self, dt: f32) -> TickContext {
        TickContext {
            tick: self.tick,
            dt_seconds: dt,
            seed: self.seed,
        }
    }

    /// Entity views in spawn order.
    fn snapshot(&self) -> Vec<EntityView> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .map(|record| EntityView {
                id: record.entity.id,
                kind: record.entity.kind,
                position: record.entity.position,
                state: record.entity.state,
            })
            .collect()
    }
}
