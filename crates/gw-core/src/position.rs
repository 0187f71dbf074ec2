use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A grid coordinate, optionally carrying a height component.
///
/// Positions compare by field equality, so a 2D and a 3D position are never
/// equal even when their planar components match. Helpers that "modify" a
/// position return a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Optional height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

impl Position {
    /// The planar origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: None };

    /// Create a 2D position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: None }
    }

    /// Create a 3D position.
    pub const fn new_3d(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// This position with the height component dropped.
    pub const fn planar(self) -> Self {
        Self::new(self.x, self.y)
    }

    /// Per-axis deltas from `self` to `other`. The z delta is zero unless both
    /// positions carry a height.
    fn deltas(self, other: Position) -> (i64, i64, i64) {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => i64::from(b) - i64::from(a),
            _ => 0,
        };
        (dx, dy, dz)
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: Position) -> f64 {
        let (dx, dy, dz) = self.deltas(other);
        let (dx, dy, dz) = (dx as f64, dy as f64, dz as f64);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Sum of absolute per-axis deltas.
    pub fn manhattan_distance_to(self, other: Position) -> u64 {
        let (dx, dy, dz) = self.deltas(other);
        dx.unsigned_abs() + dy.unsigned_abs() + dz.unsigned_abs()
    }

    /// Largest planar delta. Height is ignored.
    pub fn chebyshev_distance_to(self, other: Position) -> u64 {
        let (dx, dy, _) = self.deltas(other);
        dx.unsigned_abs().max(dy.unsigned_abs())
    }

    /// Whether `other` is a direct planar neighbour.
    ///
    /// With `allow_diagonal` the 8-neighbourhood counts, otherwise only the
    /// four cardinal neighbours do. A position is never adjacent to itself.
    pub fn is_adjacent_to(self, other: Position, allow_diagonal: bool) -> bool {
        let (dx, dy, _) = self.deltas(other);
        let (dx, dy) = (dx.unsigned_abs(), dy.unsigned_abs());
        if allow_diagonal {
            dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
        } else {
            dx + dy == 1
        }
    }

    /// Translate by the given deltas. A 2D position stays 2D regardless of `dz`.
    ///
    /// Each axis saturates at the `i32` limits instead of overflowing.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.map(|z| z.saturating_add(dz)),
        }
    }

    /// Planar translation, keeping the height as is. Saturates like
    /// [`Position::offset`].
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        self.offset(dx, dy, 0)
    }

    /// Unit vector pointing from `self` towards `other`.
    ///
    /// Coinciding positions yield the zero vector; callers must treat that as
    /// "no direction". The result has a z component iff `self` has one.
    pub fn direction_to(self, other: Position) -> Vector {
        let (dx, dy, dz) = self.deltas(other);
        let (dx, dy, dz) = (dx as f64, dy as f64, dz as f64);
        let magnitude = (dx * dx + dy * dy + dz * dz).sqrt();
        if magnitude == 0.0 {
            return Vector {
                x: 0.0,
                y: 0.0,
                z: self.z.map(|_| dz),
            };
        }
        Vector {
            x: dx / magnitude,
            y: dy / magnitude,
            z: self.z.map(|_| dz / magnitude),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({}, {}, {})", self.x, self.y, z),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

impl FromStr for Position {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let parts = inner
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| GridError::ParsePosition(s.to_string()))?;

        match parts.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            [x, y, z] => Ok(Self::new_3d(*x, *y, *z)),
            _ => Err(GridError::ParsePosition(s.to_string())),
        }
    }
}

/// A floating-point direction, as produced by [`Position::direction_to`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component, present when the origin position had a height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Vector {
    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        let z = self.z.unwrap_or(0.0);
        (self.x * self.x + self.y * self.y + z * z).sqrt()
    }

    /// Whether this is the degenerate zero direction.
    pub fn is_zero(&self) -> bool {
        self.magnitude() == 0.0
    }
}
