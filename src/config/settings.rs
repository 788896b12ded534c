//! Configuration settings for the hex Life simulator

use crate::driver::ticker::tick_interval;
use crate::hex_life::automaton::DEFAULT_PARALLEL_THRESHOLD;
use crate::hex_life::grid::{DEFAULT_SIZE, MAX_SIZE};
use crate::hex_life::HexLifeRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub simulation: SimulationConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub generations: usize,
    /// Updates per second for continuous running
    pub ups: f64,
    pub parallel_threshold: usize,
    #[serde(default)]
    pub rules: HexLifeRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub pattern_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_coordinates: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig { size: DEFAULT_SIZE },
            simulation: SimulationConfig {
                generations: 10,
                ups: 1.0,
                parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
                rules: HexLifeRules::default(),
            },
            input: InputConfig {
                pattern_file: PathBuf::from("input/patterns/triple.txt"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                show_coordinates: false,
                output_directory: PathBuf::from("output"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.size == 0 || self.grid.size > MAX_SIZE {
            anyhow::bail!("Grid size must be between 1 and {}, got {}", MAX_SIZE, self.grid.size);
        }

        tick_interval(self.simulation.ups).context("Invalid simulation rate")?;

        self.simulation
            .rules
            .validate()
            .context("Invalid simulation rules")?;

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.grid.size = size;
        }
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(ups) = cli_overrides.ups {
            self.simulation.ups = ups;
        }
        if let Some(ref pattern_file) = cli_overrides.pattern_file {
            self.input.pattern_file = pattern_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<u32>,
    pub generations: Option<usize>,
    pub ups: Option<f64>,
    pub pattern_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}
