use tileway::agents::{
    Behavior, EntityController, EntityId, EntityKind, EntitySpec, State, Transition,
};
use tileway::nav::{Cell, Grid, MovementPolicy, Pathfinder, Vec2};

const COURIER: EntityKind = EntityKind("courier");

/// A courier routes around a wall to a drop-off point, then reports done.
#[test]
fn courier_delivers_across_a_walled_world() {
    let mut grid = Grid::new(12, 12);
    for y in 0..11 {
        grid.set_walkable(6, y, false);
    }
    let pathfinder = Pathfinder::with_cache(grid, MovementPolicy::orthogonal(), 32);
    let mut controller = EntityController::new(pathfinder, 99).with_smoothing(false);

    let behavior = Behavior::new("dispatch", 0.0)
        .state(
            "dispatch",
            State::new(|entity, _, ctx| {
                if ctx.find_path(entity, Cell::new(11, 0)) {
                    Transition::To("en_route")
                } else {
                    Transition::Remain
                }
            }),
        )
        .state(
            "en_route",
            State::new(|entity, _, _| {
                if entity.is_moving {
                    Transition::Remain
                } else {
                    Transition::To("delivered")
                }
            }),
        )
        .state("delivered", State::new(|_, _, _| Transition::Remain));

    controller.register_behavior(COURIER, behavior).unwrap();
    let id = controller
        .spawn(
            EntitySpec::new(EntityId(1), COURIER, Vec2::new(0.5, 0.5)).speed(8.0),
        )
        .unwrap();

    for _ in 0..40 {
        controller.update(0.25).unwrap();
        if controller.is_in_state(id, "delivered") {
            break;
        }
    }

    assert!(controller.is_in_state(id, "delivered"));
    let entity = controller.entity(id).unwrap();
    assert_eq!(entity.cell(), Cell::new(11, 0));
    assert!(!entity.is_moving);
}
