use gw_core::{Position, UnitPlacement, World};

use crate::query::positions_at;

const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Whether `(x, y)` lies inside `map_id`'s bounds. Wrapping is ignored.
///
/// A missing map makes every coordinate invalid.
pub fn is_valid_position(world: &World, map_id: &str, x: i32, y: i32) -> bool {
    world.map(map_id).is_some_and(|map| map.in_bounds(x, y))
}

/// The in-bounds neighbours of `(x, y)`: four cardinal ones, then the four
/// diagonals when `allow_diagonal` is set.
///
/// Empty if the map does not exist.
pub fn adjacent_positions(
    world: &World,
    map_id: &str,
    x: i32,
    y: i32,
    allow_diagonal: bool,
) -> Vec<Position> {
    let Some(map) = world.map(map_id) else {
        return Vec::new();
    };
    let diagonals: &[(i32, i32)] = if allow_diagonal { &DIAGONAL } else { &[] };
    CARDINAL
        .iter()
        .chain(diagonals)
        .filter_map(|&(dx, dy)| Some(Position::new(x.checked_add(dx)?, y.checked_add(dy)?)))
        .filter(|p| map.in_bounds(p.x, p.y))
        .collect()
}

/// Records standing next to `reference` on its map, the reference unit
/// itself excluded.
pub fn adjacent_occupants<'a>(
    records: &'a [UnitPlacement],
    world: &World,
    reference: &UnitPlacement,
    allow_diagonal: bool,
) -> Vec<&'a UnitPlacement> {
    adjacent_positions(
        world,
        &reference.map_id,
        reference.position.x,
        reference.position.y,
        allow_diagonal,
    )
    .into_iter()
    .flat_map(|p| positions_at(records, &reference.map_id, p.x, p.y))
    .filter(|p| p.unit_id != reference.unit_id)
    .collect()
}
