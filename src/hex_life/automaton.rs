//! Generational update over a hex grid

use super::cell::Cell;
use super::coord::HexCoord;
use super::error::GridError;
use super::events::{GridEvent, Notifier};
use super::grid::{Grid, ResizeReport};
use super::io::{self, LoadReport, Snapshot};
use super::rules::HexLifeRules;
use crossbeam_channel::Receiver;
use rayon::prelude::*;
use tracing::debug;

/// Grids with at least this many cells compute the prepare phase in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Drives a [`Grid`] through generations and tells observers about it.
///
/// Every mutation goes through `&mut self`, so a single owner (or a mutex
/// around it) serializes all operations.
#[derive(Debug)]
pub struct Automaton {
    grid: Grid,
    rules: HexLifeRules,
    generation: u64,
    parallel_threshold: usize,
    notifier: Notifier,
}

/// Counts from one completed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub generation: u64,
    pub born: usize,
    pub died: usize,
    pub alive: usize,
}

impl Automaton {
    pub fn new(size: u32) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::new(size)?))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            rules: HexLifeRules::default(),
            generation: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            notifier: Notifier::default(),
        }
    }

    pub fn with_rules(mut self, rules: HexLifeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &HexLifeRules {
        &self.rules
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.grid.cells()
    }

    pub fn find_cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.find_cell(x, y)
    }

    /// Receive a [`GridEvent`] for every observable change from now on
    pub fn subscribe(&mut self) -> Receiver<GridEvent> {
        self.notifier.subscribe()
    }

    /// Resize the grid; observers hear about it only if the size changed
    pub fn resize(&mut self, new_size: u32) -> Result<Option<ResizeReport>, GridError> {
        let report = self.grid.resize(new_size)?;
        if let Some(report) = &report {
            self.notifier.emit(GridEvent::Resized {
                from: report.from,
                to: report.to,
            });
        }
        Ok(report)
    }

    pub fn set_alive(&mut self, x: i32, y: i32, alive: bool) -> Result<(), GridError> {
        let coord = HexCoord::new(x, y);
        self.grid.set_alive(coord, alive)?;
        self.notifier.emit(GridEvent::CellChanged { coord, alive });
        Ok(())
    }

    /// Flip one cell and return its new state
    pub fn toggle(&mut self, x: i32, y: i32) -> Result<bool, GridError> {
        let coord = HexCoord::new(x, y);
        let alive = self.grid.toggle(coord)?;
        self.notifier.emit(GridEvent::CellChanged { coord, alive });
        Ok(alive)
    }

    /// Advance one generation.
    ///
    /// Every cell's next state is computed from the current generation before
    /// any cell is updated.
    pub fn tick(&mut self) -> TickSummary {
        self.prepare_turn();
        let (born, died) = self.execute_turn();
        self.generation += 1;

        let summary = TickSummary {
            generation: self.generation,
            born,
            died,
            alive: self.grid.alive_count(),
        };
        debug!(
            generation = summary.generation,
            born, died,
            alive = summary.alive,
            "tick"
        );
        self.notifier.emit(GridEvent::Ticked {
            generation: self.generation,
        });
        summary
    }

    /// Compute `pending_alive` for every cell, reading only current `alive` values
    fn prepare_turn(&mut self) {
        let grid = &self.grid;
        let rules = &self.rules;
        let next_state = |cell: &Cell| rules.next_state(cell.alive, grid.alive_neighbour_count(cell));

        let pending: Vec<bool> = if grid.len() >= self.parallel_threshold {
            let cells: Vec<&Cell> = grid.cells().collect();
            cells.par_iter().map(|cell| next_state(*cell)).collect()
        } else {
            grid.cells().map(next_state).collect()
        };

        for (cell, pending_alive) in self.grid.cells.values_mut().zip(pending) {
            cell.pending_alive = pending_alive;
        }
    }

    /// Commit `pending_alive`, returning (born, died)
    fn execute_turn(&mut self) -> (usize, usize) {
        let mut born = 0;
        let mut died = 0;
        for cell in self.grid.cells.values_mut() {
            match (cell.alive, cell.pending_alive) {
                (false, true) => born += 1,
                (true, false) => died += 1,
                _ => {}
            }
            cell.alive = cell.pending_alive;
        }
        (born, died)
    }

    /// Alive-set as `x,y` pairs separated by spaces, in creation order
    pub fn alive_string(&self) -> String {
        io::alive_string(&self.grid)
    }

    /// Replace the alive-set from text and restart the generation count.
    ///
    /// Never fails: malformed tokens and out-of-grid pairs are reported, not applied.
    pub fn load_alive_string(&mut self, text: &str) -> LoadReport {
        let report = io::apply_alive_string(&mut self.grid, text);
        self.generation = 0;
        self.notifier.emit(GridEvent::Loaded {
            alive: self.grid.alive_count(),
        });
        report
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.grid.size(),
            generation: self.generation,
            rules: self.rules.to_string(),
            alive: self.grid.alive_coords().into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::from_grid(Grid::default())
    }
}
