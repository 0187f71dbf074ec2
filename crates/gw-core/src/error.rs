use crate::unit::UnitId;

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur when building or mutating maps and worlds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A map was created or resized with a zero dimension.
    #[error("invalid map dimensions: {width}x{height}")]
    InvalidDimensions {
        /// The rejected width.
        width: u32,
        /// The rejected height.
        height: u32,
    },

    /// A position string did not contain two or three integer components.
    #[error("cannot parse position from \"{0}\"")]
    ParsePosition(String),

    /// No map with the given name is registered in the world.
    #[error("map not found: \"{0}\"")]
    MapNotFound(String),

    /// A map with the same name is already registered in the world.
    #[error("map already exists: \"{0}\"")]
    DuplicateMap(String),

    /// The unit has no tracked position in the world.
    #[error("unit not tracked: {0}")]
    UnitNotFound(UnitId),

    /// A map being adopted holds a unit that is already placed elsewhere.
    #[error("unit already placed: {0}")]
    UnitAlreadyPlaced(UnitId),

    /// The coordinate does not resolve to a cell on a bounded map.
    #[error("position ({x}, {y}) is out of bounds")]
    OutOfBounds {
        /// Requested x coordinate.
        x: i32,
        /// Requested y coordinate.
        y: i32,
    },

    /// The target cell already holds a unit.
    #[error("cell ({x}, {y}) is occupied by {occupant}")]
    CellOccupied {
        /// Requested x coordinate.
        x: i32,
        /// Requested y coordinate.
        y: i32,
        /// The unit currently standing there.
        occupant: UnitId,
    },

    /// The target cell's terrain is impassable.
    #[error("cell ({x}, {y}) is impassable")]
    CellBlocked {
        /// Requested x coordinate.
        x: i32,
        /// Requested y coordinate.
        y: i32,
    },

    /// A map configuration could not be loaded.
    #[error("invalid map config: {0}")]
    InvalidConfig(String),
}

impl GridError {
    /// Returns true for constraint failures that are expected during normal
    /// play (contested or blocked tiles, duplicate names).
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            Self::DuplicateMap(_)
                | Self::UnitAlreadyPlaced(_)
                | Self::OutOfBounds { .. }
                | Self::CellOccupied { .. }
                | Self::CellBlocked { .. }
        )
    }

    /// Returns true when a map or unit lookup failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MapNotFound(_) | Self::UnitNotFound(_))
    }
}
