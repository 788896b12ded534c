//! Hexagonal coordinates, ring distance and adjacency

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offsets of the six hex neighbours: same x, same y, and the `dx == dy` diagonal.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 6] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, -1),
];

/// Identity key of a cell within a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub x: i32,
    pub y: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Distance of this coordinate from the origin, in rings.
    ///
    /// When `x` and `y` have opposite signs the two axes add up, otherwise the
    /// larger magnitude wins. This equals the number of neighbour steps needed
    /// to reach the origin.
    pub fn ring(&self) -> u32 {
        let (x, y) = (self.x, self.y);
        if (x < 0 && y > 0) || (x > 0 && y < 0) {
            x.unsigned_abs() + y.unsigned_abs()
        } else {
            x.unsigned_abs().max(y.unsigned_abs())
        }
    }

    /// Whether `other` is one of the six hex neighbours of `self`
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx == 0 && dy.abs() == 1) || (dy == 0 && dx.abs() == 1) || (dx == dy && dx.abs() == 1)
    }

    /// All six adjacent coordinates, whether or not they exist in a grid
    pub fn adjacent(&self) -> impl Iterator<Item = HexCoord> + '_ {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(move |(dx, dy)| HexCoord::new(self.x + dx, self.y + dy))
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<HexCoord> for (i32, i32) {
    fn from(coord: HexCoord) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
