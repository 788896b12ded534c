//! Ring-bounded hexagonal grid

use super::cell::{Cell, Neighbours};
use super::coord::HexCoord;
use super::error::{GridError, InvariantViolation};
use indexmap::IndexMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default ring radius of a freshly created session
pub const DEFAULT_SIZE: u32 = 5;

/// Largest accepted size. Coordinates are `i32`, and the cell count grows
/// quadratically, so anything beyond this is a typo rather than a request.
pub const MAX_SIZE: u32 = 1 << 14;

/// All cells with `ring < size`, keyed by coordinate in creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    pub(crate) cells: IndexMap<HexCoord, Cell>,
}

/// Outcome of an effective resize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeReport {
    pub from: u32,
    pub to: u32,
    pub added: usize,
    pub removed: usize,
    pub elapsed: Duration,
}

impl Grid {
    /// Create a grid of the given size with every cell dead
    pub fn new(size: u32) -> Result<Self, GridError> {
        validate_size(size)?;
        let mut grid = Self {
            size,
            cells: IndexMap::with_capacity(Self::expected_cell_count(size)),
        };
        grid.add_missing_cells(size);
        grid.recompute_neighbours();
        debug!(size, cells = grid.len(), "created grid");
        Ok(grid)
    }

    /// Number of cells a grid of `size` holds: the centred hexagonal number
    pub fn expected_cell_count(size: u32) -> usize {
        let s = size as usize;
        if s == 0 {
            0
        } else {
            3 * s * (s - 1) + 1
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid holds at least the origin.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn find_cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cells.get(&HexCoord::new(x, y))
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Cells in creation order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    pub fn is_alive(&self, coord: HexCoord) -> bool {
        self.cells.get(&coord).is_some_and(|cell| cell.alive)
    }

    pub fn set_alive(&mut self, coord: HexCoord, alive: bool) -> Result<(), GridError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or_else(|| GridError::not_found(coord))?;
        cell.alive = alive;
        Ok(())
    }

    /// Flip a cell and return its new state
    pub fn toggle(&mut self, coord: HexCoord) -> Result<bool, GridError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or_else(|| GridError::not_found(coord))?;
        cell.alive = !cell.alive;
        Ok(cell.alive)
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.alive = false;
        }
    }

    /// Coordinates of living cells in creation order
    pub fn alive_coords(&self) -> Vec<HexCoord> {
        self.cells
            .values()
            .filter(|cell| cell.alive)
            .map(Cell::coord)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.cells.values().filter(|cell| cell.alive).count()
    }

    /// Count living neighbours of a cell in the current generation
    pub fn alive_neighbour_count(&self, cell: &Cell) -> u8 {
        cell.neighbours
            .iter()
            .filter(|nb| self.is_alive(**nb))
            .count() as u8
    }

    /// Grow or shrink the grid, keeping every surviving cell and its state.
    ///
    /// Returns `None` when `new_size` equals the current size.
    pub fn resize(&mut self, new_size: u32) -> Result<Option<ResizeReport>, GridError> {
        validate_size(new_size)?;
        if new_size == self.size {
            return Ok(None);
        }

        let start = Instant::now();
        let from = self.size;
        let before = self.len();
        let (added, removed) = if new_size < from {
            self.shrink(new_size);
            (0, before - self.len())
        } else {
            let added = self.add_missing_cells(new_size);
            self.recompute_neighbours();
            (added, 0)
        };
        self.size = new_size;

        debug_assert_eq!(self.check_invariants(), Ok(()));

        let report = ResizeReport {
            from,
            to: new_size,
            added,
            removed,
            elapsed: start.elapsed(),
        };
        debug!(
            from,
            to = new_size,
            added,
            removed,
            elapsed_us = report.elapsed.as_micros() as u64,
            "resized grid"
        );
        Ok(Some(report))
    }

    /// Drop out-of-ring cells and prune references to them. Adjacency among
    /// survivors is left untouched.
    fn shrink(&mut self, new_size: u32) {
        self.cells.retain(|coord, _| coord.ring() < new_size);
        for cell in self.cells.values_mut() {
            cell.neighbours.retain(|nb| nb.ring() < new_size);
        }
    }

    /// Create every in-bounds cell that does not exist yet, scanning x then y
    fn add_missing_cells(&mut self, size: u32) -> usize {
        let bound = size as i32;
        let mut added = 0;
        for x in (1 - bound)..bound {
            for y in (1 - bound)..bound {
                let coord = HexCoord::new(x, y);
                if coord.ring() >= size || self.cells.contains_key(&coord) {
                    continue;
                }
                self.cells.insert(coord, Cell::new(coord));
                added += 1;
            }
        }
        added
    }

    /// Rebuild every neighbour set from the adjacency rule
    fn recompute_neighbours(&mut self) {
        let computed: Vec<Neighbours> = self
            .cells
            .keys()
            .map(|coord| {
                coord
                    .adjacent()
                    .filter(|nb| self.cells.contains_key(nb))
                    .collect()
            })
            .collect();
        for (cell, neighbours) in self.cells.values_mut().zip(computed) {
            cell.neighbours = neighbours;
        }
    }

    /// Verify membership, uniqueness and neighbour consistency
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (key, cell) in &self.cells {
            let coord = cell.coord();
            if *key != coord {
                return Err(InvariantViolation::KeyMismatch { key: *key, coord });
            }
            if coord.ring() >= self.size {
                return Err(InvariantViolation::OutOfRing {
                    coord,
                    ring: coord.ring(),
                    size: self.size,
                });
            }

            for (i, nb) in cell.neighbours.iter().enumerate() {
                if cell.neighbours[..i].contains(nb) {
                    return Err(InvariantViolation::DuplicateNeighbour { cell: coord, neighbour: *nb });
                }
                let Some(other) = self.cells.get(nb) else {
                    return Err(InvariantViolation::StaleNeighbour { cell: coord, neighbour: *nb });
                };
                if !coord.is_adjacent(nb) {
                    return Err(InvariantViolation::NotAdjacent { cell: coord, neighbour: *nb });
                }
                if !other.has_neighbour(&coord) {
                    return Err(InvariantViolation::Asymmetric { a: coord, b: *nb });
                }
            }

            for nb in coord.adjacent() {
                if self.cells.contains_key(&nb) && !cell.has_neighbour(&nb) {
                    return Err(InvariantViolation::MissingNeighbour { cell: coord, neighbour: nb });
                }
            }
        }

        let bound = self.size as i32;
        for x in (1 - bound)..bound {
            for y in (1 - bound)..bound {
                let coord = HexCoord::new(x, y);
                if coord.ring() < self.size && !self.cells.contains_key(&coord) {
                    return Err(InvariantViolation::MissingCell { coord });
                }
            }
        }

        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        let mut grid = Self {
            size: DEFAULT_SIZE,
            cells: IndexMap::new(),
        };
        grid.add_missing_cells(DEFAULT_SIZE);
        grid.recompute_neighbours();
        grid
    }
}

fn validate_size(size: u32) -> Result<(), GridError> {
    if size == 0 || size > MAX_SIZE {
        return Err(GridError::InvalidSize { size, max: MAX_SIZE });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(grid: &Grid) -> Vec<(i32, i32)> {
        grid.cells().map(|cell| cell.coord().into()).collect()
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4).unwrap();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.len(), 37);
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.cells().all(|cell| cell.ring() < 4));
        assert_eq!(grid.check_invariants(), Ok(()));
    }

    #[test]
    fn test_size_one_is_lonely_origin() {
        let grid = Grid::new(1).unwrap();
        assert_eq!(coords(&grid), vec![(0, 0)]);
        assert!(grid.find_cell(0, 0).unwrap().neighbours().is_empty());
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(Grid::new(0), Err(GridError::InvalidSize { size: 0, .. })));
        let mut grid = Grid::new(3).unwrap();
        assert!(grid.resize(0).is_err());
        assert!(grid.resize(MAX_SIZE + 1).is_err());
        assert_eq!(grid.size(), 3);
    }

    #[test]
    fn test_creation_order_scans_x_then_y() {
        let grid = Grid::new(2).unwrap();
        assert_eq!(
            coords(&grid),
            vec![(-1, -1), (-1, 0), (0, -1), (0, 0), (0, 1), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn test_neighbour_counts() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(grid.find_cell(0, 0).unwrap().neighbours().len(), 6);
        assert_eq!(grid.find_cell(1, 1).unwrap().neighbours().len(), 6);
        // Corner of the outer ring
        assert_eq!(grid.find_cell(2, 2).unwrap().neighbours().len(), 3);
        // Edge of the outer ring
        assert_eq!(grid.find_cell(2, 1).unwrap().neighbours().len(), 4);
    }

    #[test]
    fn test_find_cell_absent() {
        let grid = Grid::new(2).unwrap();
        assert!(grid.find_cell(1, -1).is_none());
        assert!(grid.find_cell(5, 5).is_none());
    }

    #[test]
    fn test_resize_noop() {
        let mut grid = Grid::new(3).unwrap();
        assert_eq!(grid.resize(3).unwrap(), None);
    }

    #[test]
    fn test_grow_keeps_state_and_links_new_cells() {
        let mut grid = Grid::new(2).unwrap();
        grid.set_alive(HexCoord::new(1, 1), true).unwrap();

        let report = grid.resize(4).unwrap().unwrap();
        assert_eq!((report.from, report.to), (2, 4));
        assert_eq!(report.added, 37 - 7);
        assert_eq!(report.removed, 0);

        assert!(grid.is_alive(HexCoord::new(1, 1)));
        assert_eq!(grid.alive_count(), 1);
        // Former boundary cell now has a full neighbourhood
        assert_eq!(grid.find_cell(1, 1).unwrap().neighbours().len(), 6);
        // Old cells keep their creation position
        assert_eq!(&coords(&grid)[..7], &coords(&Grid::new(2).unwrap())[..]);
        assert_eq!(grid.check_invariants(), Ok(()));
    }

    #[test]
    fn test_shrink_removes_out_of_ring_cells() {
        let mut grid = Grid::new(4).unwrap();
        grid.set_alive(HexCoord::new(3, 0), true).unwrap();
        grid.set_alive(HexCoord::new(1, 0), true).unwrap();

        let report = grid.resize(2).unwrap().unwrap();
        assert_eq!(report.removed, 30);
        assert_eq!(grid.len(), 7);
        assert!(grid.find_cell(3, 0).is_none());
        assert_eq!(grid.alive_coords(), vec![HexCoord::new(1, 0)]);
        for cell in grid.cells() {
            assert!(cell.ring() < 2);
            assert!(cell.neighbours().iter().all(|nb| grid.contains(*nb)));
        }
        assert_eq!(grid.check_invariants(), Ok(()));
    }

    #[test]
    fn test_set_alive_on_missing_cell() {
        let mut grid = Grid::new(2).unwrap();
        assert_eq!(
            grid.set_alive(HexCoord::new(4, 4), true),
            Err(GridError::CellNotFound { x: 4, y: 4 })
        );
        assert_eq!(grid.toggle(HexCoord::ORIGIN), Ok(true));
        assert_eq!(grid.toggle(HexCoord::ORIGIN), Ok(false));
    }

    #[test]
    fn test_invariant_check_detects_asymmetry() {
        let mut grid = Grid::new(3).unwrap();
        let origin = grid.cells.get_mut(&HexCoord::ORIGIN).unwrap();
        origin.neighbours.retain(|nb| *nb != HexCoord::new(1, 0));
        assert!(matches!(
            grid.check_invariants(),
            Err(InvariantViolation::Asymmetric { .. }) | Err(InvariantViolation::MissingNeighbour { .. })
        ));
    }

    #[test]
    fn test_invariant_check_detects_stale_neighbour() {
        let mut grid = Grid::new(3).unwrap();
        grid.cells.shift_remove(&HexCoord::new(2, 2));
        assert!(grid.check_invariants().is_err());
    }

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!(grid.size(), DEFAULT_SIZE);
        assert_eq!(grid.len(), Grid::expected_cell_count(DEFAULT_SIZE));
        assert_eq!(grid.check_invariants(), Ok(()));
    }
}
