//! Drivers that pace the automaton outside of direct calls

pub mod ticker;

pub use ticker::Ticker;
