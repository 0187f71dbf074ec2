use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of ground covering a cell. Extensible via `Custom(String)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Open plains; the baseline every other kind is measured against.
    #[default]
    Grass,
    /// Woodland: slower, offers cover, blocks sight.
    Forest,
    /// Rolling high ground.
    Hills,
    /// Steep, slow, commanding terrain.
    Mountain,
    /// Shallow water that can be waded.
    Water,
    /// Water too deep to cross on foot.
    DeepWater,
    /// Sand and dunes.
    Desert,
    /// Marsh and bog.
    Swamp,
    /// Paved or beaten track.
    Road,
    /// Solid obstruction.
    Wall,
    /// A kind defined by the game layer. Uses grass defaults.
    Custom(String),
}

impl TerrainKind {
    /// Parse a terrain name. Unrecognized names become `Custom`.
    pub fn parse(s: &str) -> Self {
        match s {
            "grass" | "plains" => Self::Grass,
            "forest" => Self::Forest,
            "hills" => Self::Hills,
            "mountain" => Self::Mountain,
            "water" => Self::Water,
            "deep_water" => Self::DeepWater,
            "desert" => Self::Desert,
            "swamp" => Self::Swamp,
            "road" => Self::Road,
            "wall" => Self::Wall,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Default properties for this kind.
    pub fn default_properties(&self) -> TerrainProperties {
        let base = TerrainProperties::default();
        match self {
            Self::Grass | Self::Custom(_) => base,
            Self::Forest => TerrainProperties {
                movement_cost: 1.5,
                defense_bonus: Some(1.0),
                visibility_modifier: Some(-1.0),
                ..base
            },
            Self::Hills => TerrainProperties {
                movement_cost: 2.0,
                defense_bonus: Some(1.0),
                visibility_modifier: Some(1.0),
                ..base
            },
            Self::Mountain => TerrainProperties {
                movement_cost: 3.0,
                defense_bonus: Some(2.0),
                visibility_modifier: Some(2.0),
                ..base
            },
            Self::Water => TerrainProperties {
                movement_cost: 2.0,
                defense_bonus: Some(-1.0),
                ..base
            },
            Self::DeepWater | Self::Wall => TerrainProperties {
                impassable: true,
                ..base
            },
            Self::Desert => TerrainProperties {
                movement_cost: 1.5,
                ..base
            },
            Self::Swamp => TerrainProperties {
                movement_cost: 2.5,
                defense_bonus: Some(-1.0),
                visibility_modifier: Some(-1.0),
                ..base
            },
            Self::Road => TerrainProperties {
                movement_cost: 0.5,
                ..base
            },
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grass => write!(f, "grass"),
            Self::Forest => write!(f, "forest"),
            Self::Hills => write!(f, "hills"),
            Self::Mountain => write!(f, "mountain"),
            Self::Water => write!(f, "water"),
            Self::DeepWater => write!(f, "deep_water"),
            Self::Desert => write!(f, "desert"),
            Self::Swamp => write!(f, "swamp"),
            Self::Road => write!(f, "road"),
            Self::Wall => write!(f, "wall"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// Movement, defense and visibility effects of a cell's terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainProperties {
    /// Movement cost multiplier; always positive.
    pub movement_cost: f64,
    /// Bonus (or penalty) to a defending unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_bonus: Option<f64>,
    /// Change to sight range from this cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_modifier: Option<f64>,
    /// Blocks walking and placement regardless of cost.
    #[serde(default)]
    pub impassable: bool,
}

impl Default for TerrainProperties {
    fn default() -> Self {
        Self {
            movement_cost: 1.0,
            defense_bonus: None,
            visibility_modifier: None,
            impassable: false,
        }
    }
}

impl TerrainProperties {
    /// Apply `overrides` on top of these properties. Present override fields win.
    pub fn merged(mut self, overrides: &TerrainOverride) -> Self {
        if let Some(cost) = overrides.movement_cost {
            self.movement_cost = cost;
        }
        if let Some(bonus) = overrides.defense_bonus {
            self.defense_bonus = Some(bonus);
        }
        if let Some(modifier) = overrides.visibility_modifier {
            self.visibility_modifier = Some(modifier);
        }
        if let Some(impassable) = overrides.impassable {
            self.impassable = impassable;
        }
        self
    }
}

/// Caller-supplied adjustments to a terrain kind's default properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainOverride {
    /// Replacement movement cost.
    pub movement_cost: Option<f64>,
    /// Replacement defense bonus.
    pub defense_bonus: Option<f64>,
    /// Replacement visibility modifier.
    pub visibility_modifier: Option<f64>,
    /// Replacement blocking flag.
    pub impassable: Option<bool>,
}

impl TerrainOverride {
    /// Override the movement cost.
    pub fn with_movement_cost(mut self, cost: f64) -> Self {
        self.movement_cost = Some(cost);
        self
    }

    /// Override the defense bonus.
    pub fn with_defense_bonus(mut self, bonus: f64) -> Self {
        self.defense_bonus = Some(bonus);
        self
    }

    /// Override the visibility modifier.
    pub fn with_visibility_modifier(mut self, modifier: f64) -> Self {
        self.visibility_modifier = Some(modifier);
        self
    }

    /// Override the blocking flag.
    pub fn with_impassable(mut self, impassable: bool) -> Self {
        self.impassable = Some(impassable);
        self
    }
}
