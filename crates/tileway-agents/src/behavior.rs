use std::collections::BTreeMap;

use tileway_core::SplitMix64;
use tileway_nav::{Cell, Pathfinder, Vec2};

use crate::entity::{Entity, EntityKind, EntityView};
use crate::queries;

pub type StateName = &'static str;

/// Result of a state's `update` callback.
///
/// Returning the current state's name inside `To` is equivalent to `Remain`.
/// Returning an unknown name is a configuration error surfaced by the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Remain,
    To(StateName),
}

pub type HookFn = Box<dyn FnMut(&mut Entity, &mut BehaviorCtx<'_>)>;
pub type UpdateFn = Box<dyn FnMut(&mut Entity, f32, &mut BehaviorCtx<'_>) -> Transition>;

/// One state of a behavior: a mandatory `update` plus optional enter/exit
/// hooks.
pub struct State {
    pub(crate) on_enter: Option<HookFn>,
    pub(crate) update: UpdateFn,
    pub(crate) on_exit: Option<HookFn>,
}

impl State {
    pub fn new(
        update: impl FnMut(&mut Entity, f32, &mut BehaviorCtx<'_>) -> Transition + 'static,
    ) -> Self {
        Self {
            on_enter: None,
            update: Box::new(update),
            on_exit: None,
        }
    }

    pub fn on_enter(mut self, hook: impl FnMut(&mut Entity, &mut BehaviorCtx<'_>) + 'static) -> Self {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_exit(mut self, hook: impl FnMut(&mut Entity, &mut BehaviorCtx<'_>) + 'static) -> Self {
        self.on_exit = Some(Box::new(hook));
        self
    }
}

/// Per-entity-kind labeled transition system.
///
/// The state graph is caller-defined; no restriction is imposed on which
/// states may reach which others.
pub struct Behavior {
    initial: StateName,
    /// Seconds between FSM evaluations for entities of this kind.
    update_interval: f32,
    sight_distance: Option<f32>,
    states: BTreeMap<StateName, State>,
}

impl Behavior {
    pub fn new(initial: StateName, update_interval: f32) -> Self {
        Self {
            initial,
            update_interval: update_interval.max(0.0),
            sight_distance: None,
            states: BTreeMap::new(),
        }
    }

    pub fn state(mut self, name: StateName, state: State) -> Self {
        self.states.insert(name, state);
        self
    }

    pub fn sight_distance(mut self, distance: f32) -> Self {
        self.sight_distance = Some(distance);
        self
    }

    pub fn initial(&self) -> StateName {
        self.initial
    }

    pub fn update_interval(&self) -> f32 {
        self.update_interval
    }

    pub fn sight(&self) -> Option<f32> {
        self.sight_distance
    }

    pub fn has_state(&self, name: StateName) -> bool {
        self.states.contains_key(name)
    }

    pub(crate) fn run_update(
        &mut self,
        name: StateName,
        entity: &mut Entity,
        elapsed: f32,
        ctx: &mut BehaviorCtx<'_>,
    ) -> Option<Transition> {
        let state = self.states.get_mut(name)?;
        Some((state.update)(entity, elapsed, ctx))
    }

    pub(crate) fn run_enter(&mut self, name: StateName, entity: &mut Entity, ctx: &mut BehaviorCtx<'_>) {
        if let Some(state) = self.states.get_mut(name) {
            if let Some(hook) = &mut state.on_enter {
                hook(entity, ctx);
            }
        }
    }

    pub(crate) fn run_exit(&mut self, name: StateName, entity: &mut Entity, ctx: &mut BehaviorCtx<'_>) {
        if let Some(state) = self.states.get_mut(name) {
            if let Some(hook) = &mut state.on_exit {
                hook(entity, ctx);
            }
        }
    }
}

/// Capability handed to behavior callbacks; the sole channel through which
/// state code reaches pathfinding and spatial queries.
///
/// Entity views reflect positions at tick start and exclude the entity being
/// updated, keeping reads order-independent while writes stay single-writer.
pub struct BehaviorCtx<'a> {
    pathfinder: &'a mut Pathfinder,
    views: &'a [EntityView],
    rng: SplitMix64,
    smooth_paths: bool,
}

impl<'a> BehaviorCtx<'a> {
    pub(crate) fn new(
        pathfinder: &'a mut Pathfinder,
        views: &'a [EntityView],
        rng: SplitMix64,
        smooth_paths: bool,
    ) -> Self {
        Self {
            pathfinder,
            views,
            rng,
            smooth_paths,
        }
    }

    /// Routes the entity from its current cell to its `target`; assigns the
    /// path on success. `false` when there is no target or no path.
    pub fn find_path_to_target(&mut self, entity: &mut Entity) -> bool {
        let Some(target) = entity.target else {
            return false;
        };
        self.find_path(entity, Cell::from_position(target))
    }

    /// Routes the entity to an explicit goal cell; assigns the path and sets
    /// the entity's target on success.
    pub fn find_path(&mut self, entity: &mut Entity, goal: Cell) -> bool {
        let result = self.pathfinder.find_path_cells(entity.cell(), goal, self.smooth_paths);
        if !result.found {
            return false;
        }
        entity.target = Some(goal.center());
        entity.assign_path(result.path);
        true
    }

    pub fn has_line_of_sight(&self, a: Cell, b: Cell) -> bool {
        self.pathfinder.grid().line_of_sight(a, b)
    }

    pub fn find_walkable_near(&self, cell: Cell, radius: i32) -> Option<Cell> {
        queries::walkable_near(self.pathfinder.grid(), cell, radius)
    }

    pub fn find_random_walkable(&mut self) -> Option<Cell> {
        queries::random_walkable(self.pathfinder.grid(), &mut self.rng)
    }

    pub fn find_random_walkable_near(&mut self, anchor: Cell, radius: i32) -> Option<Cell> {
        queries::random_walkable_near(self.pathfinder.grid(), &mut self.rng, anchor, radius)
    }

    /// Views of all other live entities, in spawn order.
    pub fn entities(&self) -> &[EntityView] {
        self.views
    }

    pub fn nearest(&self, pos: Vec2, filter: Option<EntityKind>) -> Option<&EntityView> {
        queries::nearest(self.views, pos, filter)
    }

    pub fn within_radius(&self, pos: Vec2, radius: f32, filter: Option<EntityKind>) -> Vec<&EntityView> {
        queries::within_radius(self.views, pos, radius, filter)
    }

    /// Deterministic per-entity random stream for this evaluation.
    pub fn rng(&mut self) -> &mut SplitMix64 {
        &mut self.rng
    }
}
