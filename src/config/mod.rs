//! Configuration management for the hex Life simulator

pub mod settings;

pub use settings::{
    Settings, GridConfig, SimulationConfig, InputConfig, OutputConfig, OutputFormat, CliOverrides
};
