//! Configuration for newly created maps.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::terrain::TerrainKind;

/// Configuration applied when a map is created or grown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Fold out-of-range coordinates back into the grid instead of rejecting them.
    pub wrap_edges: bool,
    /// Terrain for every fresh cell.
    pub default_terrain: TerrainKind,
    /// Movement cost for every fresh cell, replacing the terrain's own default.
    pub default_movement_cost: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            wrap_edges: false,
            default_terrain: TerrainKind::Grass,
            default_movement_cost: 1.0,
        }
    }
}

impl MapConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> GridResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a map relies on.
    pub fn validate(&self) -> GridResult<()> {
        check_movement_cost("default_movement_cost", self.default_movement_cost)
    }

    /// Enable or disable edge wrapping.
    pub fn with_wrap_edges(mut self, wrap: bool) -> Self {
        self.wrap_edges = wrap;
        self
    }

    /// Set the terrain fresh cells start with.
    pub fn with_default_terrain(mut self, terrain: TerrainKind) -> Self {
        self.default_terrain = terrain;
        self
    }

    /// Set the movement cost fresh cells start with.
    pub fn with_default_movement_cost(mut self, cost: f64) -> Self {
        self.default_movement_cost = cost;
        self
    }
}

/// Movement costs must be finite and strictly positive.
pub(crate) fn check_movement_cost(field: &str, cost: f64) -> GridResult<()> {
    if cost.is_finite() && cost > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidConfig(format!(
            "{field} must be positive, got {cost}"
        )))
    }
}
