//! Error types for grid operations

use super::coord::HexCoord;
use thiserror::Error;

/// Errors returned by grid and automaton operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size must be between 1 and {max}, got {size}")]
    InvalidSize { size: u32, max: u32 },

    #[error("no cell at ({x}, {y})")]
    CellNotFound { x: i32, y: i32 },

    #[error("grid invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl GridError {
    pub fn not_found(coord: HexCoord) -> Self {
        Self::CellNotFound {
            x: coord.x,
            y: coord.y,
        }
    }
}

/// A structural inconsistency in a grid. Always a bug in resize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("cell {coord} stored under key {key}")]
    KeyMismatch { key: HexCoord, coord: HexCoord },

    #[error("cell {coord} has ring {ring}, outside size {size}")]
    OutOfRing { coord: HexCoord, ring: u32, size: u32 },

    #[error("in-bounds cell {coord} is missing")]
    MissingCell { coord: HexCoord },

    #[error("cell {cell} lists {neighbour} more than once")]
    DuplicateNeighbour { cell: HexCoord, neighbour: HexCoord },

    #[error("cell {cell} lists removed cell {neighbour}")]
    StaleNeighbour { cell: HexCoord, neighbour: HexCoord },

    #[error("cell {cell} lists non-adjacent cell {neighbour}")]
    NotAdjacent { cell: HexCoord, neighbour: HexCoord },

    #[error("cell {cell} does not list adjacent cell {neighbour}")]
    MissingNeighbour { cell: HexCoord, neighbour: HexCoord },

    #[error("{a} lists {b} but {b} does not list {a}")]
    Asymmetric { a: HexCoord, b: HexCoord },
}
