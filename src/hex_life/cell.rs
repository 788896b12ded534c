//! A single hexagonal tile

use super::coord::HexCoord;
use smallvec::SmallVec;

/// Neighbour keys of a cell; at most six on a hex tiling.
pub type Neighbours = SmallVec<[HexCoord; 6]>;

/// One cell of the grid.
///
/// Neighbours are stored as coordinate keys into the owning [`Grid`](super::Grid),
/// never as references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: HexCoord,
    pub(crate) alive: bool,
    pub(crate) pending_alive: bool,
    pub(crate) neighbours: Neighbours,
}

impl Cell {
    pub fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            alive: false,
            pending_alive: false,
            neighbours: Neighbours::new(),
        }
    }

    pub fn coord(&self) -> HexCoord {
        self.coord
    }

    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }

    pub fn ring(&self) -> u32 {
        self.coord.ring()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Next-generation state computed by the last prepare phase
    pub fn pending_alive(&self) -> bool {
        self.pending_alive
    }

    pub fn neighbours(&self) -> &[HexCoord] {
        &self.neighbours
    }

    pub fn has_neighbour(&self, coord: &HexCoord) -> bool {
        self.neighbours.contains(coord)
    }
}
