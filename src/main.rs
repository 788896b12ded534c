//! Main CLI application for the hex Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hex_life::{
    config::{CliOverrides, OutputFormat, Settings},
    driver::Ticker,
    hex_life::{
        create_example_patterns, io::save_snapshot_to_file, load_pattern_from_file,
        save_pattern_to_file, Automaton, GridEvent,
    },
    utils::{ColorOutput, GridFormatter},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hex_life")]
#[command(about = "Game of Life on a ring-bounded hexagonal grid")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pattern for a number of generations
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file with the initial alive-string (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Grid size in rings (overrides config)
        #[arg(short, long)]
        size: Option<u32>,

        /// Number of generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Print the grid after every generation
        #[arg(long)]
        show_evolution: bool,

        /// Save the final state to the output directory
        #[arg(long)]
        save: bool,
    },

    /// Render a pattern without running it
    Show {
        /// Pattern file with an alive-string
        #[arg(short, long, conflicts_with = "alive")]
        pattern: Option<PathBuf>,

        /// Alive-string given inline, e.g. "0,0 1,0 0,1"
        #[arg(short, long)]
        alive: Option<String>,

        /// Grid size in rings
        #[arg(short, long, default_value_t = hex_life::hex_life::DEFAULT_SIZE)]
        size: u32,

        /// Label rows with their y coordinate
        #[arg(long)]
        coords: bool,
    },

    /// Run a pattern continuously for a fixed time
    Watch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Grid size in rings (overrides config)
        #[arg(short, long)]
        size: Option<u32>,

        /// Updates per second (overrides config)
        #[arg(short, long)]
        ups: Option<f64>,

        /// How long to run, in seconds
        #[arg(short, long, default_value_t = 10.0)]
        duration: f64,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format '{}', expected 'text' or 'json'", other)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let out = ColorOutput::detect();
    match dispatch(cli.command, out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", out.error(&error));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands, out: ColorOutput) -> Result<()> {
    match command {
        Commands::Run {
            config, pattern, size, generations, output, format,
            show_evolution, save
        } => {
            let overrides = CliOverrides {
                size,
                generations,
                pattern_file: pattern,
                output_dir: output,
                format,
                ..CliOverrides::default()
            };
            run_command(config, overrides, show_evolution, save, out)
        }
        Commands::Show { pattern, alive, size, coords } => {
            show_command(pattern, alive, size, coords, out)
        }
        Commands::Watch { config, pattern, size, ups, duration } => {
            let overrides = CliOverrides {
                size,
                ups,
                pattern_file: pattern,
                ..CliOverrides::default()
            };
            watch_command(config, overrides, duration, out)
        }
        Commands::Setup { directory, force } => setup_command(directory, force, out),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "hex_life=debug" } else { "hex_life=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config (or defaults) and apply overrides
fn load_settings(config_path: &PathBuf, overrides: &CliOverrides, out: ColorOutput) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!("{}", out.warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Settings::default()
    };
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn build_automaton(settings: &Settings, out: ColorOutput) -> Result<Automaton> {
    let pattern = load_pattern_from_file(&settings.input.pattern_file)?;
    let mut automaton = Automaton::new(settings.grid.size)
        .context("Failed to create grid")?
        .with_rules(settings.simulation.rules.clone())
        .with_parallel_threshold(settings.simulation.parallel_threshold);

    let report = automaton.load_alive_string(&pattern);
    let message = GridFormatter::format_load_report(&report);
    if report.is_clean() && report.out_of_grid == 0 {
        println!("{}", out.info(&message));
    } else {
        println!("{}", out.warning(&message));
    }
    Ok(automaton)
}

fn render(automaton: &Automaton, show_coordinates: bool) -> String {
    if show_coordinates {
        GridFormatter::format_grid_with_coords(automaton.grid())
    } else {
        GridFormatter::format_grid(automaton.grid())
    }
}

fn run_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    show_evolution: bool,
    save: bool,
    out: ColorOutput,
) -> Result<()> {
    let settings = load_settings(&config_path, &overrides, out)?;
    let mut automaton = build_automaton(&settings, out)?;
    let show_coordinates = settings.output.show_coordinates;

    println!("{}", out.info(&format!(
        "Running {} generation(s) of {} on a size {} grid ({} cells)",
        settings.simulation.generations,
        automaton.rules(),
        automaton.size(),
        automaton.grid().len()
    )));

    if show_evolution {
        println!("Generation 0:");
        println!("{}", render(&automaton, show_coordinates));
    }

    let start_time = Instant::now();
    for _ in 0..settings.simulation.generations {
        let summary = automaton.tick();
        if show_evolution {
            println!("{}", GridFormatter::format_tick(&summary));
            println!("{}", render(&automaton, show_coordinates));
        }
        if summary.alive == 0 {
            println!("{}", out.warning(&format!(
                "Population died out at generation {}", summary.generation
            )));
            break;
        }
    }
    let elapsed = start_time.elapsed();

    match settings.output.format {
        OutputFormat::Text => {
            if !show_evolution {
                println!("Generation {}:", automaton.generation());
                println!("{}", render(&automaton, show_coordinates));
            }
            println!("Alive: {}", automaton.alive_string());
        }
        OutputFormat::Json => {
            let json = automaton.snapshot().to_json().context("Failed to serialize snapshot")?;
            println!("{}", json);
        }
    }

    println!("{}", out.success(&format!(
        "✅ {} generation(s) in {:.3}s", automaton.generation(), elapsed.as_secs_f64()
    )));

    if save {
        let dir = &settings.output.output_directory;
        match settings.output.format {
            OutputFormat::Text => {
                let path = dir.join("final.txt");
                save_pattern_to_file(automaton.grid(), &path)?;
                println!("Saved: {}", path.display());
            }
            OutputFormat::Json => {
                let path = dir.join("final.json");
                save_snapshot_to_file(&automaton.snapshot(), &path)?;
                println!("Saved: {}", path.display());
            }
        }
    }

    Ok(())
}

fn show_command(
    pattern_file: Option<PathBuf>,
    alive: Option<String>,
    size: u32,
    coords: bool,
    out: ColorOutput,
) -> Result<()> {
    let text = match (pattern_file, alive) {
        (Some(path), _) => load_pattern_from_file(&path)?,
        (None, Some(alive)) => alive,
        (None, None) => String::new(),
    };

    let mut automaton = Automaton::new(size).context("Failed to create grid")?;
    let report = automaton.load_alive_string(&text);
    if !report.is_clean() || report.out_of_grid > 0 {
        println!("{}", out.warning(&GridFormatter::format_load_report(&report)));
    }

    println!("{}", render(&automaton, coords));
    println!("Alive: {}", automaton.alive_string());
    Ok(())
}

/// When a watch of `seconds` started at `start` should end
fn watch_deadline(start: Instant, seconds: f64) -> Result<Instant> {
    let duration = Duration::try_from_secs_f64(seconds)
        .context("Duration must be a non-negative number of seconds")?;
    start
        .checked_add(duration)
        .with_context(|| format!("Duration of {} seconds is too long", seconds))
}

fn watch_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    duration: f64,
    out: ColorOutput,
) -> Result<()> {
    let settings = load_settings(&config_path, &overrides, out)?;
    let mut automaton = build_automaton(&settings, out)?;
    let events = automaton.subscribe();
    let show_coordinates = settings.output.show_coordinates;

    println!("{}", render(&automaton, show_coordinates));

    let deadline = watch_deadline(Instant::now(), duration)?;
    let mut ticker = Ticker::start(Arc::new(Mutex::new(automaton)), settings.simulation.ups)?;

    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match events.recv_timeout(remaining) {
            Ok(GridEvent::Ticked { generation }) => {
                let automaton = ticker.lock();
                println!("Generation {}:", generation);
                println!("{}", render(&automaton, show_coordinates));
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    ticker.stop();

    println!("{}", out.success(&format!("Stopped after {} tick(s)", ticker.ticks())));
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool, out: ColorOutput) -> Result<()> {
    println!("{}", out.info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/patterns");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&input_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut small = Settings::default();
    small.grid.size = 4;
    small.simulation.generations = 4;
    small.input.pattern_file = PathBuf::from("input/patterns/pair.txt");
    small.to_file(&examples_dir.join("small.yaml"))?;

    let mut large = Settings::default();
    large.grid.size = 20;
    large.simulation.generations = 50;
    large.simulation.ups = 10.0;
    large.output.format = OutputFormat::Json;
    large.input.pattern_file = PathBuf::from("input/patterns/ring.txt");
    large.to_file(&examples_dir.join("large.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", out.success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own alive-strings to {}", input_dir.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}
