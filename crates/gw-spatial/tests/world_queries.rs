//! Spatial queries run against placements taken from a live world.

use gw_core::{Map, MapConfig, Position, TerrainKind, UnitPlacement, World};
use gw_spatial::{
    DistanceMetric, adjacent_occupants, find_collisions, is_valid_position, positions_in_map,
    positions_within_range, step_towards,
};
use proptest::prelude::*;

/// A world with a 12x8 field (a wall across row 4) and a 5x5 cave.
fn skirmish() -> World {
    let mut world = World::new();
    let mut field = Map::new(12, 8, "field", MapConfig::default()).unwrap();
    field.fill_terrain(0, 4, 10, 1, &TerrainKind::Wall, None);
    world.add_map(field).unwrap();
    world
        .add_map(Map::new(5, 5, "cave", MapConfig::default()).unwrap())
        .unwrap();

    for (id, map, x, y) in [
        ("knight", "field", 2, 2),
        ("archer", "field", 3, 2),
        ("scout", "field", 6, 6),
        ("rat", "cave", 0, 0),
    ] {
        world
            .set_unit_position(id, map, Position::new(x, y))
            .unwrap();
    }
    world
}

// ---------------------------------------------------------------------------
// Records taken from a world
// ---------------------------------------------------------------------------

#[test]
fn world_snapshot_never_collides() {
    let world = skirmish();
    assert!(find_collisions(&world.all_units()).is_empty());
}

#[test]
fn range_query_over_world_snapshot() {
    let world = skirmish();
    let records = world.all_units();
    let knight = records
        .iter()
        .find(|p| p.unit_id.as_str() == "knight")
        .unwrap();

    let close: Vec<&str> =
        positions_within_range(&records, knight, 1.0, DistanceMetric::Manhattan)
            .into_iter()
            .map(|p| p.unit_id.as_str())
            .collect();
    assert_eq!(close, vec!["archer"]);

    let all_field = positions_within_range(&records, knight, 100.0, DistanceMetric::Euclidean);
    assert_eq!(all_field.len(), 2);
    assert_eq!(positions_in_map(&records, "cave").len(), 1);
}

#[test]
fn adjacent_occupants_match_world_adjacency() {
    let world = skirmish();
    let records = world.all_units();
    let knight = records
        .iter()
        .find(|p| p.unit_id.as_str() == "knight")
        .unwrap();

    let next_to: Vec<&str> = adjacent_occupants(&records, &world, knight, false)
        .into_iter()
        .map(|p| p.unit_id.as_str())
        .collect();
    assert_eq!(next_to, vec!["archer"]);
    assert_eq!(world.are_units_adjacent("knight", "archer", false), Some(true));
}

#[test]
fn bulk_import_collisions_are_detected() {
    let world = skirmish();
    let mut imported = world.all_units();
    imported.push(UnitPlacement::new("intruder", "field", Position::new(6, 6)));

    let groups = find_collisions(&imported);
    assert_eq!(groups.len(), 1);
    let ids: Vec<&str> = groups[0].iter().map(|p| p.unit_id.as_str()).collect();
    assert_eq!(ids, vec!["scout", "intruder"]);
}

// ---------------------------------------------------------------------------
// Walking a unit with step_towards
// ---------------------------------------------------------------------------

#[test]
fn greedy_walk_reaches_open_target() {
    let mut world = skirmish();
    let target = Position::new(11, 2);

    for _ in 0..20 {
        let here = world.unit_position("archer").unwrap().position;
        if here == target {
            break;
        }
        let next = step_towards(&world, "field", here, target);
        world.move_unit("archer", next.x, next.y).unwrap();
    }

    assert_eq!(
        world.unit_position("archer").map(|l| l.position),
        Some(target)
    );
    assert!(world.consistency_violations().is_empty());
}

#[test]
fn greedy_step_into_wall_is_rejected() {
    let mut world = skirmish();
    let here = world.unit_position("knight").unwrap().position;
    let next = step_towards(&world, "field", here, Position::new(2, 7));
    assert_eq!(next, Position::new(2, 3));
    world.move_unit("knight", next.x, next.y).unwrap();

    let blocked = step_towards(&world, "field", next, Position::new(2, 7));
    assert_eq!(blocked, Position::new(2, 4));
    assert!(world.move_unit("knight", blocked.x, blocked.y).is_err());
    assert_eq!(
        world.unit_position("knight").map(|l| l.position),
        Some(Position::new(2, 3))
    );
}

proptest! {
    #[test]
    fn step_stays_valid_and_never_moves_away(
        fx in 0i32..12, fy in 0i32..8, tx in 0i32..12, ty in 0i32..8
    ) {
        let world = skirmish();
        let from = Position::new(fx, fy);
        let to = Position::new(tx, ty);
        let next = step_towards(&world, "field", from, to);

        prop_assert!(is_valid_position(&world, "field", next.x, next.y));
        prop_assert!(next.manhattan_distance_to(to) <= from.manhattan_distance_to(to));
        prop_assert!(from.manhattan_distance_to(next) <= 1);
        if from != to {
            prop_assert!(from.is_adjacent_to(next, false));
        }
    }
}
