use std::cell::RefCell;
use std::rc::Rc;

use tileway_agents::{
    Behavior, ConfigError, EntityController, EntityId, EntityKind, EntitySpec, State, Transition,
};
use tileway_nav::{Grid, MovementPolicy, Pathfinder, Vec2};

const GUARD: EntityKind = EntityKind("guard");

fn controller() -> EntityController {
    let pathfinder = Pathfinder::new(Grid::new(10, 10), MovementPolicy::orthogonal());
    EntityController::new(pathfinder, 7)
}

fn spawn_guard(controller: &mut EntityController, id: u64) -> EntityId {
    controller
        .spawn(EntitySpec::new(EntityId(id), GUARD, Vec2::new(1.5, 1.5)))
        .expect("spawn should succeed")
}

#[test]
fn transition_runs_exit_then_enter_exactly_once() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let (l_update, l_exit, l_enter, l_alert) =
        (log.clone(), log.clone(), log.clone(), log.clone());

    let behavior = Behavior::new("idle", 0.0)
        .state(
            "idle",
            State::new(move |_, _, _| {
                l_update.borrow_mut().push("idle.update");
                Transition::To("alert")
            })
            .on_exit(move |_, _| l_exit.borrow_mut().push("idle.exit")),
        )
        .state(
            "alert",
            State::new(move |_, _, _| {
                l_alert.borrow_mut().push("alert.update");
                Transition::Remain
            })
            .on_enter(move |_, _| l_enter.borrow_mut().push("alert.enter")),
        );

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    let id = spawn_guard(&mut controller, 1);

    controller.update(0.1).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["idle.update", "idle.exit", "alert.enter"],
        "exit fires before enter, each exactly once"
    );
    assert!(controller.is_in_state(id, "alert"));

    controller.update(0.1).unwrap();
    assert_eq!(log.borrow().last().copied(), Some("alert.update"));
}

#[test]
fn initial_on_enter_runs_at_spawn() {
    let entered = Rc::new(RefCell::new(0u32));
    let counter = entered.clone();

    let behavior = Behavior::new("idle", 1.0).state(
        "idle",
        State::new(|_, _, _| Transition::Remain).on_enter(move |_, _| *counter.borrow_mut() += 1),
    );

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    spawn_guard(&mut controller, 1);
    assert_eq!(*entered.borrow(), 1);
}

#[test]
fn returning_current_state_name_means_remain() {
    let exits = Rc::new(RefCell::new(0u32));
    let counter = exits.clone();

    let behavior = Behavior::new("idle", 0.0).state(
        "idle",
        State::new(|_, _, _| Transition::To("idle")).on_exit(move |_, _| *counter.borrow_mut() += 1),
    );

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    let id = spawn_guard(&mut controller, 1);
    controller.update(0.1).unwrap();
    assert!(controller.is_in_state(id, "idle"));
    assert_eq!(*exits.borrow(), 0, "self-transition must not run hooks");
}

#[test]
fn unknown_transition_target_is_a_config_error() {
    let behavior = Behavior::new("idle", 0.0)
        .state("idle", State::new(|_, _, _| Transition::To("phantom")));

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    let id = spawn_guard(&mut controller, 1);

    let err = controller.update(0.1).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownState {
            state: "phantom",
            kind: GUARD
        }
    );
    assert!(
        controller.is_in_state(id, "idle"),
        "entity must not land in a phantom state"
    );
}

#[test]
fn spawn_with_unregistered_kind_fails() {
    let mut controller = controller();
    let err = controller
        .spawn(EntitySpec::new(EntityId(1), EntityKind("ghost"), Vec2::ZERO))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownKind {
            kind: EntityKind("ghost")
        }
    );
}

#[test]
fn duplicate_entity_id_fails() {
    let behavior = Behavior::new("idle", 1.0).state("idle", State::new(|_, _, _| Transition::Remain));
    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();

    spawn_guard(&mut controller, 1);
    let err = controller
        .spawn(EntitySpec::new(EntityId(1), GUARD, Vec2::ZERO))
        .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateEntity { id: EntityId(1) });
}

#[test]
fn duplicate_behavior_registration_fails() {
    let mut controller = controller();
    let first = Behavior::new("idle", 1.0).state("idle", State::new(|_, _, _| Transition::Remain));
    let second = Behavior::new("idle", 1.0).state("idle", State::new(|_, _, _| Transition::Remain));

    controller.register_behavior(GUARD, first).unwrap();
    let err = controller.register_behavior(GUARD, second).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateBehavior { kind: GUARD });
}

#[test]
fn behavior_without_its_initial_state_fails_registration() {
    let behavior = Behavior::new("missing", 1.0)
        .state("idle", State::new(|_, _, _| Transition::Remain));
    let mut controller = controller();
    let err = controller.register_behavior(GUARD, behavior).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingInitialState {
            state: "missing",
            kind: GUARD
        }
    );
}

#[test]
fn update_interval_preserves_fractional_carry() {
    let elapsed_log: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = elapsed_log.clone();

    let behavior = Behavior::new("idle", 0.5).state(
        "idle",
        State::new(move |_, elapsed, _| {
            sink.borrow_mut().push(elapsed);
            Transition::Remain
        }),
    );

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    spawn_guard(&mut controller, 1);

    // Accumulated timer: 0.3, 0.6*, 0.4, 0.7*, 0.5*, ...
    for _ in 0..5 {
        controller.update(0.3).unwrap();
    }
    let log = elapsed_log.borrow();
    assert_eq!(log.len(), 3, "three evaluations in 1.5 simulated seconds");
    assert!((log[0] - 0.6).abs() < 1e-5);
    assert!((log[1] - 0.7).abs() < 1e-5);
}

#[test]
fn manual_change_state_runs_hooks_and_listeners() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let (l_exit, l_enter) = (log.clone(), log.clone());

    let behavior = Behavior::new("idle", 10.0)
        .state(
            "idle",
            State::new(|_, _, _| Transition::Remain)
                .on_exit(move |_, _| l_exit.borrow_mut().push("idle.exit")),
        )
        .state(
            "alert",
            State::new(|_, _, _| Transition::Remain)
                .on_enter(move |_, _| l_enter.borrow_mut().push("alert.enter")),
        );

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    let id = spawn_guard(&mut controller, 1);

    let events: Rc<RefCell<Vec<(EntityId, &'static str, &'static str)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    controller.on_state_change(move |id, old, new| sink.borrow_mut().push((id, old, new)));

    controller.change_state(id, "alert").unwrap();
    assert_eq!(*log.borrow(), vec!["idle.exit", "alert.enter"]);
    assert_eq!(*events.borrow(), vec![(id, "idle", "alert")]);
    assert!(controller.is_in_state(id, "alert"));

    // Overriding to the current state is a no-op.
    controller.change_state(id, "alert").unwrap();
    assert_eq!(events.borrow().len(), 1);

    let err = controller.change_state(id, "phantom").unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownState {
            state: "phantom",
            kind: GUARD
        }
    );
}

#[test]
fn listener_unsubscribe_stops_notifications() {
    let behavior = Behavior::new("a", 10.0)
        .state("a", State::new(|_, _, _| Transition::Remain))
        .state("b", State::new(|_, _, _| Transition::Remain));

    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();
    let id = spawn_guard(&mut controller, 1);

    let count = Rc::new(RefCell::new(0u32));
    let sink = count.clone();
    let token = controller.on_state_change(move |_, _, _| *sink.borrow_mut() += 1);

    controller.change_state(id, "b").unwrap();
    assert_eq!(*count.borrow(), 1);

    assert!(controller.remove_listener(token));
    controller.change_state(id, "a").unwrap();
    assert_eq!(*count.borrow(), 1, "removed listener must stay silent");
    assert!(!controller.remove_listener(token), "double removal is a no-op");
}

#[test]
fn despawn_removes_the_entity() {
    let behavior = Behavior::new("idle", 1.0).state("idle", State::new(|_, _, _| Transition::Remain));
    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();

    let id = spawn_guard(&mut controller, 1);
    assert_eq!(controller.len(), 1);

    let entity = controller.despawn(id).unwrap();
    assert_eq!(entity.id, id);
    assert!(controller.is_empty());
    assert_eq!(controller.state_of(id), None);
    assert_eq!(
        controller.despawn(id).unwrap_err(),
        ConfigError::UnknownEntity { id }
    );
}

#[test]
fn behavior_records_its_tuning_knobs() {
    let behavior = Behavior::new("idle", 1.5)
        .state("idle", State::new(|_, _, _| Transition::Remain))
        .sight_distance(6.0);
    assert_eq!(behavior.sight(), Some(6.0));
    assert_eq!(behavior.update_interval(), 1.5);
    assert!(behavior.has_state("idle"));
    assert!(!behavior.has_state("alert"));
}

#[test]
fn states_map_reports_every_live_entity() {
    let behavior = Behavior::new("idle", 1.0).state("idle", State::new(|_, _, _| Transition::Remain));
    let mut controller = controller();
    controller.register_behavior(GUARD, behavior).unwrap();

    let a = spawn_guard(&mut controller, 1);
    let b = spawn_guard(&mut controller, 2);

    let states = controller.states();
    assert_eq!(states.len(), 2);
    assert_eq!(states.get(&a), Some(&"idle"));
    assert_eq!(states.get(&b), Some(&"idle"));
}
