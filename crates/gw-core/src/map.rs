use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{MapConfig, check_movement_cost};
use crate::error::{GridError, GridResult};
use crate::position::Position;
use crate::terrain::{TerrainKind, TerrainOverride, TerrainProperties};
use crate::unit::UnitId;

/// One square of a map: its terrain and at most one occupying unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The ground covering this cell.
    pub terrain: TerrainKind,
    /// Effective properties of the terrain, overrides included.
    pub properties: TerrainProperties,
    /// The unit standing here, if any.
    pub occupant: Option<UnitId>,
}

impl Cell {
    /// An empty cell with the kind's default properties.
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            properties: terrain.default_properties(),
            terrain,
            occupant: None,
        }
    }

    /// An empty cell as configured for fresh map space.
    pub fn from_config(config: &MapConfig) -> Self {
        let mut cell = Self::new(config.default_terrain.clone());
        cell.properties.movement_cost = config.default_movement_cost;
        cell
    }

    /// Whether a unit stands here.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Whether a unit could enter: passable terrain and nobody home.
    pub fn is_walkable(&self) -> bool {
        !self.properties.impassable && self.occupant.is_none()
    }
}

/// A rectangular grid of cells, optionally wrapping at its edges.
///
/// Cells are stored row-major as `cells[y][x]`. On a bounded map only
/// `0 <= x < width` and `0 <= y < height` address a cell and every other
/// coordinate yields `None`; on a wrapped map every coordinate folds back into
/// range.
///
/// A map enforces one unit per cell but not one cell per unit: keeping a unit
/// in a single place is the job of [`crate::World`].
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    name: String,
    width: u32,
    height: u32,
    config: MapConfig,
    cells: Vec<Vec<Cell>>,
}

impl Map {
    /// Create a map filled with the configured default terrain.
    ///
    /// Fails on a zero dimension or a config that does not validate.
    pub fn new(
        width: u32,
        height: u32,
        name: impl Into<String>,
        config: MapConfig,
    ) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        config.validate()?;
        let fresh = Cell::from_config(&config);
        let cells = (0..height)
            .map(|_| vec![fresh.clone(); width as usize])
            .collect();
        Ok(Self {
            name: name.into(),
            width,
            height,
            config,
            cells,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The map's name, unique within a world.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The configuration the map was built with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Whether coordinates wrap around the edges.
    pub fn wraps_edges(&self) -> bool {
        self.config.wrap_edges
    }

    // -----------------------------------------------------------------------
    // Coordinate resolution
    // -----------------------------------------------------------------------

    /// Strict bounds check that ignores wrapping.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        u32::try_from(x).is_ok_and(|x| x < self.width)
            && u32::try_from(y).is_ok_and(|y| y < self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if self.config.wrap_edges {
            let col = i64::from(x).rem_euclid(i64::from(self.width));
            let row = i64::from(y).rem_euclid(i64::from(self.height));
            Some((col as usize, row as usize))
        } else if self.in_bounds(x, y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    /// The canonical coordinate `(x, y)` addresses, or `None` when it
    /// addresses no cell.
    pub fn resolve(&self, x: i32, y: i32) -> Option<Position> {
        self.index(x, y)
            .map(|(col, row)| Position::new(col as i32, row as i32))
    }

    // -----------------------------------------------------------------------
    // Cells and terrain
    // -----------------------------------------------------------------------

    /// The cell at `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|(col, row)| &self.cells[row][col])
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|(col, row)| &mut self.cells[row][col])
    }

    /// The terrain kind at `(x, y)`.
    pub fn terrain(&self, x: i32, y: i32) -> Option<&TerrainKind> {
        self.cell(x, y).map(|cell| &cell.terrain)
    }

    /// The effective terrain properties at `(x, y)`.
    pub fn terrain_properties(&self, x: i32, y: i32) -> Option<&TerrainProperties> {
        self.cell(x, y).map(|cell| &cell.properties)
    }

    /// Replace the terrain at `(x, y)`.
    ///
    /// The cell takes the kind's default properties with `overrides` applied
    /// on top. The occupant is left alone. An override cost that is not
    /// finite and positive is rejected with [`GridError::InvalidConfig`].
    pub fn set_terrain(
        &mut self,
        x: i32,
        y: i32,
        terrain: TerrainKind,
        overrides: Option<&TerrainOverride>,
    ) -> GridResult<()> {
        let (col, row) = self.index(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        if let Some(cost) = overrides.and_then(|o| o.movement_cost) {
            check_movement_cost("movement_cost override", cost)?;
        }
        let mut properties = terrain.default_properties();
        if let Some(overrides) = overrides {
            properties = properties.merged(overrides);
        }
        trace!(map = %self.name, x, y, terrain = %terrain, "terrain set");
        let cell = &mut self.cells[row][col];
        cell.terrain = terrain;
        cell.properties = properties;
        Ok(())
    }

    /// Paint a `width` x `height` rectangle starting at `(x, y)`.
    ///
    /// Coordinates that address no cell are skipped, and an invalid override
    /// paints nothing. Returns the number of cells painted.
    pub fn fill_terrain(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        terrain: &TerrainKind,
        overrides: Option<&TerrainOverride>,
    ) -> usize {
        let mut painted = 0;
        for dy in 0..height {
            for dx in 0..width {
                let (Some(cx), Some(cy)) = (shift(x, dx), shift(y, dy)) else {
                    continue;
                };
                if self.set_terrain(cx, cy, terrain.clone(), overrides).is_ok() {
                    painted += 1;
                }
            }
        }
        painted
    }

    /// Movement cost of entering `(x, y)`; infinite when there is no cell.
    pub fn movement_cost(&self, x: i32, y: i32) -> f64 {
        self.cell(x, y)
            .map_or(f64::INFINITY, |cell| cell.properties.movement_cost)
    }

    /// Whether a unit could step onto `(x, y)`.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(Cell::is_walkable)
    }

    /// Whether [`Map::place_unit`] would succeed at `(x, y)`.
    pub fn can_place_unit_at(&self, x: i32, y: i32) -> bool {
        self.is_walkable(x, y)
    }

    // -----------------------------------------------------------------------
    // Occupancy
    // -----------------------------------------------------------------------

    /// Put a unit on `(x, y)`.
    ///
    /// Fails if the cell is missing, impassable or already taken. Does not
    /// check whether the unit stands somewhere else on this map.
    pub fn place_unit(&mut self, id: impl Into<UnitId>, x: i32, y: i32) -> GridResult<()> {
        let cell = self.cell_mut(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        if cell.properties.impassable {
            return Err(GridError::CellBlocked { x, y });
        }
        if let Some(occupant) = &cell.occupant {
            return Err(GridError::CellOccupied {
                x,
                y,
                occupant: occupant.clone(),
            });
        }
        cell.occupant = Some(id.into());
        Ok(())
    }

    /// Clear the occupant of `(x, y)`, returning who stood there.
    ///
    /// Clearing an empty cell succeeds with `None`, so the call is idempotent.
    /// Only a coordinate that addresses no cell is an error.
    pub fn remove_unit(&mut self, x: i32, y: i32) -> GridResult<Option<UnitId>> {
        let cell = self.cell_mut(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        Ok(cell.occupant.take())
    }

    /// Clear `(x, y)` only if `id` stands there.
    pub(crate) fn vacate(&mut self, id: &str, x: i32, y: i32) -> bool {
        match self.cell_mut(x, y) {
            Some(cell) if cell.occupant.as_ref().is_some_and(|o| o.as_str() == id) => {
                cell.occupant = None;
                true
            }
            _ => false,
        }
    }

    /// Put `id` back onto a cell it was just taken from, bypassing the
    /// walkability check.
    pub(crate) fn restore(&mut self, id: UnitId, x: i32, y: i32) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.occupant = Some(id);
        }
    }

    /// The unit standing on `(x, y)`.
    pub fn unit_at(&self, x: i32, y: i32) -> Option<&UnitId> {
        self.cell(x, y)?.occupant.as_ref()
    }

    /// Every occupied cell, scanned row by row.
    pub fn all_units(&self) -> Vec<(UnitId, Position)> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().filter_map(move |(col, cell)| {
                    cell.occupant
                        .clone()
                        .map(|id| (id, Position::new(col as i32, row as i32)))
                })
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Neighbourhoods and regions
    // -----------------------------------------------------------------------

    /// Cells within `range` steps of `(x, y)` on either axis, excluding the
    /// centre.
    ///
    /// Without `include_diagonals`, offsets with `|dx| == |dy|` are skipped.
    /// Coordinates that address no cell are dropped. Each entry carries the
    /// resolved coordinate of its cell.
    pub fn nearby_cells(
        &self,
        x: i32,
        y: i32,
        range: u32,
        include_diagonals: bool,
    ) -> Vec<(Position, &Cell)> {
        let reach = i32::try_from(range).unwrap_or(i32::MAX);
        let mut cells = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if !include_diagonals && dx.abs() == dy.abs() {
                    continue;
                }
                let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                if let Some((col, row)) = self.index(nx, ny) {
                    cells.push((
                        Position::new(col as i32, row as i32),
                        &self.cells[row][col],
                    ));
                }
            }
        }
        cells
    }

    /// A `height` x `width` snapshot starting at `(x, y)`.
    ///
    /// On a bounded map, coordinates outside it come back as fresh default
    /// cells; on a wrapped map they fold back into the grid. Never fails.
    pub fn region(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<Vec<Cell>> {
        (0..height)
            .map(|dy| {
                (0..width)
                    .map(|dx| {
                        shift(x, dx)
                            .zip(shift(y, dy))
                            .and_then(|(cx, cy)| self.cell(cx, cy))
                            .cloned()
                            .unwrap_or_else(|| Cell::from_config(&self.config))
                    })
                    .collect()
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Whole-map operations
    // -----------------------------------------------------------------------

    /// Change the map's dimensions.
    ///
    /// Cells still in range keep their terrain and occupant; new space is
    /// filled with default cells. Returns the units whose cells fell outside
    /// the new bounds. The map does not know about any world tracking them.
    pub fn resize(&mut self, width: u32, height: u32) -> GridResult<Vec<(UnitId, Position)>> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let displaced: Vec<(UnitId, Position)> = self
            .all_units()
            .into_iter()
            .filter(|(_, pos)| pos.x as u32 >= width || pos.y as u32 >= height)
            .collect();

        let fresh = Cell::from_config(&self.config);
        let mut old_rows = std::mem::take(&mut self.cells).into_iter();
        self.cells = (0..height)
            .map(|_| {
                let mut row = old_rows.next().unwrap_or_default();
                row.truncate(width as usize);
                row.resize(width as usize, fresh.clone());
                row
            })
            .collect();

        debug!(
            map = %self.name,
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            "map resized"
        );
        if !displaced.is_empty() {
            warn!(map = %self.name, count = displaced.len(), "resize dropped occupied cells");
        }

        self.width = width;
        self.height = height;
        Ok(displaced)
    }

    /// Deep copy of this map, optionally under a new name.
    pub fn clone_as(&self, name: Option<&str>) -> Self {
        let mut copy = self.clone();
        if let Some(name) = name {
            copy.name = name.to_string();
        }
        copy
    }
}

fn shift(base: i32, delta: u32) -> Option<i32> {
    i32::try_from(i64::from(base) + i64::from(delta)).ok()
}
