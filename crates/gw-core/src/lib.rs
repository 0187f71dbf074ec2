//! Core types for Gitterwelt: positions, terrain grids, and the world registry.
//!
//! This crate is the spatial substrate of a grid-based game. A [`Map`] is a
//! rectangle of terrain cells holding at most one unit each; a [`World`] owns
//! named maps and tracks which map and cell every unit occupies. Unit identity
//! and everything else about units belongs to the caller.

/// Map configuration and JSON loading.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// Terrain grids with single-occupancy cells.
pub mod map;
/// Grid coordinates and direction vectors.
pub mod position;
/// Terrain kinds and their movement, defense and visibility properties.
pub mod terrain;
/// Caller-supplied unit identifiers.
pub mod unit;
/// The registry of maps and unit positions.
pub mod world;

/// Re-export map configuration.
pub use config::MapConfig;
/// Re-export error types.
pub use error::{GridError, GridResult};
/// Re-export grid types.
pub use map::{Cell, Map};
/// Re-export coordinate types.
pub use position::{Position, Vector};
/// Re-export terrain types.
pub use terrain::{TerrainKind, TerrainOverride, TerrainProperties};
/// Re-export the unit identifier.
pub use unit::UnitId;
/// Re-export world model types.
pub use world::{ConsistencyViolation, UnitLocation, UnitPlacement, World};
