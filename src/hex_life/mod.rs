//! Hexagonal Game of Life core functionality

pub mod automaton;
pub mod cell;
pub mod coord;
pub mod error;
pub mod events;
pub mod grid;
pub mod io;
pub mod rules;

pub use automaton::{Automaton, TickSummary};
pub use cell::Cell;
pub use coord::HexCoord;
pub use error::{GridError, InvariantViolation};
pub use events::GridEvent;
pub use grid::{Grid, ResizeReport, DEFAULT_SIZE};
pub use io::{LoadReport, Snapshot, load_pattern_from_file, save_pattern_to_file, create_example_patterns};
pub use rules::HexLifeRules;
