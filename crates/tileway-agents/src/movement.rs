use crate::entity::Entity;

/// Distance at which a waypoint counts as reached, in cell units.
pub const ARRIVAL_EPSILON: f32 = 1e-4;

/// Advances an entity along its assigned path at `speed` cells/second.
///
/// Agnostic to why the agent is moving; driven purely by path + speed and
/// shared across every entity kind. Consumes as many waypoints as the
/// `speed * dt` budget covers. On exhausting the path the entity snaps to
/// the final waypoint, the path is cleared, and `is_moving` goes false.
pub fn advance(entity: &mut Entity, dt: f32) {
    if !entity.is_moving {
        return;
    }
    let Some(path) = entity.path.take() else {
        entity.is_moving = false;
        return;
    };

    let mut remaining = entity.speed.max(0.0) * dt.max(0.0);
    let mut pos = entity.position;
    let mut idx = entity.path_index;

    while idx < path.len() {
        let target = path[idx].center();
        let to_target = target - pos;
        let dist = to_target.length();

        if dist <= ARRIVAL_EPSILON {
            idx += 1;
            continue;
        }
        if remaining >= dist {
            pos = target;
            remaining -= dist;
            idx += 1;
            continue;
        }
        if remaining > 0.0 {
            pos = pos + to_target * (remaining / dist);
        }
        break;
    }

    entity.position = pos;
    if idx >= path.len() {
        entity.path = None;
        entity.path_index = 0;
        entity.is_moving = false;
    } else {
        entity.path = Some(path);
        entity.path_index = idx;
    }
}
