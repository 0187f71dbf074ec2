//! Stateless spatial queries for Gitterwelt.
//!
//! The functions here operate on caller-supplied lists of
//! [`gw_core::UnitPlacement`] records, consulting a [`gw_core::World`] only
//! for map bounds. They never mutate anything, which makes them suitable for
//! checking records that have not (yet) been handed to a world.

/// Greedy single-step movement.
pub mod movement;
/// Neighbourhood and bounds queries that need a world.
pub mod neighbours;
/// Filters, range queries and collision detection over placement records.
pub mod query;

/// Re-export of [`movement::step_towards`].
pub use movement::step_towards;
/// Re-exports of the neighbourhood queries.
pub use neighbours::{adjacent_occupants, adjacent_positions, is_valid_position};
/// Re-exports of the record queries.
pub use query::{
    DistanceMetric, are_adjacent, distance_between, find_collisions, position_at, positions_at,
    positions_in_map, positions_within_range,
};
