//! Hexagonal Game of Life
//!
//! This library simulates a Life-like automaton on a hexagonal grid bounded by
//! concentric rings around the origin, using the B2/S35 rule by default.

pub mod config;
pub mod driver;
pub mod hex_life;
pub mod utils;

pub use config::Settings;
pub use hex_life::{Automaton, Grid, GridError, HexCoord};

use anyhow::{Context, Result};

/// Build an automaton from settings and an alive-string, then run the configured generations
pub fn simulate(settings: &Settings, pattern: &str) -> Result<Automaton> {
    let mut automaton = Automaton::new(settings.grid.size)
        .context("Failed to create grid")?
        .with_rules(settings.simulation.rules.clone())
        .with_parallel_threshold(settings.simulation.parallel_threshold);
    automaton.load_alive_string(pattern);
    for _ in 0..settings.simulation.generations {
        automaton.tick();
    }
    Ok(automaton)
}
