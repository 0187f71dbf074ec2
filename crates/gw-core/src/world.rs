use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GridError, GridResult};
use crate::map::Map;
use crate::position::Position;
use crate::terrain::{TerrainKind, TerrainOverride};
use crate::unit::UnitId;

/// Where a tracked unit stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLocation {
    /// Name of the map the unit is on.
    pub map_id: String,
    /// The unit's cell, with wrapped coordinates folded into range.
    pub position: Position,
}

/// A unit together with its location: the record shape shared with the
/// spatial queries in `gw-spatial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// The unit.
    pub unit_id: UnitId,
    /// Name of the map the unit is on.
    pub map_id: String,
    /// The unit's cell.
    pub position: Position,
}

impl UnitPlacement {
    /// Build a placement record.
    pub fn new(unit_id: impl Into<UnitId>, map_id: impl Into<String>, position: Position) -> Self {
        Self {
            unit_id: unit_id.into(),
            map_id: map_id.into(),
            position,
        }
    }
}

/// A break in the agreement between tracked positions and cell occupants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    /// A tracked unit refers to a map the world does not hold.
    MissingMap {
        /// The tracked unit.
        unit: UnitId,
        /// The map it refers to.
        map_id: String,
    },
    /// The cell at a tracked position does not hold the tracked unit.
    CellMismatch {
        /// The tracked unit.
        unit: UnitId,
        /// The map it is tracked on.
        map_id: String,
        /// The tracked position.
        position: Position,
        /// Whoever the cell actually holds.
        found: Option<UnitId>,
    },
    /// A cell holds a unit that is not tracked at that cell.
    UntrackedOccupant {
        /// The occupant.
        unit: UnitId,
        /// The map holding the cell.
        map_id: String,
        /// The occupied cell.
        position: Position,
    },
}

/// The registry of maps and of where every unit stands.
///
/// The world owns its maps. For every tracked unit the cell at its tracked
/// position holds that unit, and every occupied cell belongs to a unit
/// tracked there. Every occupancy change goes through one relocate/vacate
/// path that updates both sides together.
///
/// Lookups return `Option`; mutators return [`GridResult`].
#[derive(Debug, Clone, Default)]
pub struct World {
    maps: Vec<Map>,
    unit_positions: BTreeMap<UnitId, UnitLocation>,
}

impl World {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Maps
    // -----------------------------------------------------------------------

    /// Adopt a map.
    ///
    /// Units already standing on the map start being tracked there. Fails if
    /// the name is taken, or if one of those units is already placed.
    pub fn add_map(&mut self, map: Map) -> GridResult<()> {
        if self.has_map(map.name()) {
            return Err(GridError::DuplicateMap(map.name().to_string()));
        }

        let occupants = map.all_units();
        let mut seen = BTreeSet::new();
        for (id, _) in &occupants {
            if self.unit_positions.contains_key(id) || !seen.insert(id) {
                return Err(GridError::UnitAlreadyPlaced(id.clone()));
            }
        }

        debug!(
            map = map.name(),
            width = map.width(),
            height = map.height(),
            units = occupants.len(),
            "map added"
        );
        for (id, position) in occupants {
            self.unit_positions.insert(
                id,
                UnitLocation {
                    map_id: map.name().to_string(),
                    position,
                },
            );
        }
        self.maps.push(map);
        Ok(())
    }

    /// Look up a map by name.
    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|map| map.name() == name)
    }

    fn map_mut(&mut self, name: &str) -> GridResult<&mut Map> {
        self.maps
            .iter_mut()
            .find(|map| map.name() == name)
            .ok_or_else(|| GridError::MapNotFound(name.to_string()))
    }

    /// Whether a map with this name is registered.
    pub fn has_map(&self, name: &str) -> bool {
        self.map(name).is_some()
    }

    /// All maps in the order they were added.
    pub fn maps(&self) -> impl Iterator<Item = &Map> {
        self.maps.iter()
    }

    /// Map names in the order they were added.
    pub fn map_names(&self) -> Vec<&str> {
        self.maps.iter().map(Map::name).collect()
    }

    /// Number of registered maps.
    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// Remove a map and stop tracking every unit on it.
    pub fn remove_map(&mut self, name: &str) -> GridResult<Map> {
        let index = self
            .maps
            .iter()
            .position(|map| map.name() == name)
            .ok_or_else(|| GridError::MapNotFound(name.to_string()))?;

        let before = self.unit_positions.len();
        self.unit_positions.retain(|_, location| location.map_id != name);
        let map = self.maps.remove(index);

        debug!(
            map = name,
            untracked = before - self.unit_positions.len(),
            "map removed"
        );
        Ok(map)
    }

    /// Change the terrain of a cell on a registered map.
    pub fn set_terrain(
        &mut self,
        map_id: &str,
        x: i32,
        y: i32,
        terrain: TerrainKind,
        overrides: Option<&TerrainOverride>,
    ) -> GridResult<()> {
        self.map_mut(map_id)?.set_terrain(x, y, terrain, overrides)
    }

    /// Resize a registered map and stop tracking the units that fell off it.
    pub fn resize_map(&mut self, map_id: &str, width: u32, height: u32) -> GridResult<Vec<UnitId>> {
        let displaced = self.map_mut(map_id)?.resize(width, height)?;
        let ids: Vec<UnitId> = displaced.into_iter().map(|(id, _)| id).collect();
        for id in &ids {
            self.unit_positions.remove(id);
        }
        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Occupancy
    // -----------------------------------------------------------------------

    /// Clear the cell `location` points at if `id` holds it. A missing map is
    /// tolerated.
    fn vacate(&mut self, id: &UnitId, location: &UnitLocation) -> bool {
        self.maps
            .iter_mut()
            .find(|map| map.name() == location.map_id)
            .is_some_and(|map| map.vacate(id.as_str(), location.position.x, location.position.y))
    }

    /// Move `id` to `position` on `map_id`, tracked or not.
    ///
    /// The previous cell is vacated before placing so a unit can be re-set
    /// onto its own cell. If placement fails the previous cell is restored
    /// and nothing else has changed.
    fn relocate(&mut self, id: UnitId, map_id: &str, position: Position) -> GridResult<()> {
        let target = self
            .maps
            .iter()
            .position(|map| map.name() == map_id)
            .ok_or_else(|| GridError::MapNotFound(map_id.to_string()))?;

        let previous = self.unit_positions.get(&id).cloned();
        let vacated = previous
            .as_ref()
            .is_some_and(|location| self.vacate(&id, location));

        let map = &mut self.maps[target];
        let canonical = map
            .resolve(position.x, position.y)
            .map(|resolved| Position {
                z: position.z,
                ..resolved
            })
            .unwrap_or(position);

        match map.place_unit(id.clone(), position.x, position.y) {
            Ok(()) => {
                debug!(
                    unit = %id,
                    map = map_id,
                    position = %canonical,
                    "unit placed"
                );
                self.unit_positions.insert(
                    id,
                    UnitLocation {
                        map_id: map_id.to_string(),
                        position: canonical,
                    },
                );
                Ok(())
            }
            Err(err) => {
                if let Some(location) = previous.filter(|_| vacated)
                    && let Some(map) = self.maps.iter_mut().find(|m| m.name() == location.map_id)
                {
                    map.restore(id.clone(), location.position.x, location.position.y);
                }
                warn!(unit = %id, map = map_id, error = %err, "placement rejected, unit unchanged");
                Err(err)
            }
        }
    }

    /// Place a unit, moving it off any cell it holds on any map.
    pub fn set_unit_position(
        &mut self,
        id: impl Into<UnitId>,
        map_id: &str,
        position: Position,
    ) -> GridResult<()> {
        self.relocate(id.into(), map_id, position)
    }

    /// Stop tracking a unit and clear its cell.
    pub fn remove_unit(&mut self, id: &str) -> GridResult<UnitLocation> {
        let (id, location) = self
            .unit_positions
            .remove_entry(id)
            .ok_or_else(|| GridError::UnitNotFound(UnitId::new(id)))?;
        self.vacate(&id, &location);
        debug!(unit = %id, map = %location.map_id, "unit removed");
        Ok(location)
    }

    fn tracked(&self, id: &str) -> GridResult<(UnitId, UnitLocation)> {
        self.unit_positions
            .get_key_value(id)
            .map(|(id, location)| (id.clone(), location.clone()))
            .ok_or_else(|| GridError::UnitNotFound(UnitId::new(id)))
    }

    /// Move a unit to `(x, y)` on the map it is on. Height is kept.
    ///
    /// On failure the unit stays where it was.
    pub fn move_unit(&mut self, id: &str, x: i32, y: i32) -> GridResult<()> {
        let (id, location) = self.tracked(id)?;
        let destination = Position {
            x,
            y,
            z: location.position.z,
        };
        self.relocate(id, &location.map_id, destination)
    }

    /// Move a unit to `(x, y)` on another map. Height is kept.
    ///
    /// On failure the unit stays where it was and the destination is left
    /// untouched.
    pub fn move_unit_to_map(&mut self, id: &str, map_id: &str, x: i32, y: i32) -> GridResult<()> {
        let (id, location) = self.tracked(id)?;
        let destination = Position {
            x,
            y,
            z: location.position.z,
        };
        self.relocate(id, map_id, destination)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Where a unit stands, if tracked.
    pub fn unit_position(&self, id: &str) -> Option<&UnitLocation> {
        self.unit_positions.get(id)
    }

    /// Whether a unit is tracked.
    pub fn is_tracked(&self, id: &str) -> bool {
        self.unit_positions.contains_key(id)
    }

    /// Number of tracked units.
    pub fn unit_count(&self) -> usize {
        self.unit_positions.len()
    }

    /// Euclidean distance between two units on the same map.
    ///
    /// `None` if either unit is untracked or they are on different maps.
    pub fn distance_between_units(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.unit_positions.get(a)?;
        let b = self.unit_positions.get(b)?;
        (a.map_id == b.map_id).then(|| a.position.distance_to(b.position))
    }

    /// Whether two units stand next to each other.
    ///
    /// `None` if either unit is untracked; units on different maps are never
    /// adjacent.
    pub fn are_units_adjacent(&self, a: &str, b: &str, allow_diagonal: bool) -> Option<bool> {
        let a = self.unit_positions.get(a)?;
        let b = self.unit_positions.get(b)?;
        Some(a.map_id == b.map_id && a.position.is_adjacent_to(b.position, allow_diagonal))
    }

    /// Every tracked unit, ordered by id.
    pub fn all_units(&self) -> Vec<UnitPlacement> {
        self.unit_positions
            .iter()
            .map(|(id, location)| UnitPlacement {
                unit_id: id.clone(),
                map_id: location.map_id.clone(),
                position: location.position,
            })
            .collect()
    }

    /// Every unit tracked on one map, ordered by id.
    pub fn units_on_map(&self, map_id: &str) -> Vec<UnitPlacement> {
        self.all_units()
            .into_iter()
            .filter(|placement| placement.map_id == map_id)
            .collect()
    }

    /// Drop every map and every tracked unit.
    pub fn clear(&mut self) {
        debug!(
            maps = self.maps.len(),
            units = self.unit_positions.len(),
            "world cleared"
        );
        self.maps.clear();
        self.unit_positions.clear();
    }

    /// Check tracked positions against cell occupants in both directions.
    pub fn consistency_violations(&self) -> Vec<ConsistencyViolation> {
        let mut violations = Vec::new();

        for (id, location) in &self.unit_positions {
            let Some(map) = self.map(&location.map_id) else {
                violations.push(ConsistencyViolation::MissingMap {
                    unit: id.clone(),
                    map_id: location.map_id.clone(),
                });
                continue;
            };
            let found = map.unit_at(location.position.x, location.position.y);
            if found != Some(id) {
                violations.push(ConsistencyViolation::CellMismatch {
                    unit: id.clone(),
                    map_id: location.map_id.clone(),
                    position: location.position,
                    found: found.cloned(),
                });
            }
        }

        for map in &self.maps {
            for (id, position) in map.all_units() {
                let tracked_here = self.unit_positions.get(&id).is_some_and(|location| {
                    location.map_id == map.name() && location.position.planar() == position
                });
                if !tracked_here {
                    violations.push(ConsistencyViolation::UntrackedOccupant {
                        unit: id,
                        map_id: map.name().to_string(),
                        position,
                    });
                }
            }
        }

        violations
    }
}
