use gw_core::{Position, World};

/// One greedy step from `from` towards `to`.
///
/// Moves a single cell along the axis with the larger distance left, x on a
/// tie, then clamps into the map's bounds. A missing map clamps everything to
/// `(0, 0)`. The height of `from` is carried over unchanged.
pub fn step_towards(world: &World, map_id: &str, from: Position, to: Position) -> Position {
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);

    let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
    if dx.abs() >= dy.abs() {
        x += dx.signum();
    } else {
        y += dy.signum();
    }

    let (max_x, max_y) = world.map(map_id).map_or((0, 0), |map| {
        (i64::from(map.width()) - 1, i64::from(map.height()) - 1)
    });

    Position {
        x: x.clamp(0, max_x) as i32,
        y: y.clamp(0, max_y) as i32,
        z: from.z,
    }
}
