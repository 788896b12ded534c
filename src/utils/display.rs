//! Display and output formatting utilities

use crate::hex_life::{Grid, HexCoord, LoadReport, ResizeReport, TickSummary};

const ALIVE: char = '⬢';
const DEAD: char = '⬡';

/// Format hex grids and run statistics for the terminal
pub struct GridFormatter;

impl GridFormatter {
    /// Render the grid as offset rows, `y` increasing upwards.
    ///
    /// A cell sits at text column `2x - y`, so each row is shifted half a
    /// cell from its neighbours and the six hex neighbours line up.
    pub fn format_grid(grid: &Grid) -> String {
        Self::render(grid, false)
    }

    /// Same as [`format_grid`](Self::format_grid) with a `y` label on every row
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        Self::render(grid, true)
    }

    fn render(grid: &Grid, label_rows: bool) -> String {
        let reach = grid.size() as i32 - 1;
        let width = (4 * reach + 1) as usize;
        let mut output = String::new();

        for y in (-reach..=reach).rev() {
            let mut row = vec![' '; width];
            for x in -reach..=reach {
                let Some(cell) = grid.get(HexCoord::new(x, y)) else {
                    continue;
                };
                let column = (2 * x - y + 2 * reach) as usize;
                row[column] = if cell.is_alive() { ALIVE } else { DEAD };
            }

            if label_rows {
                output.push_str(&format!("{:>4} ", y));
            }
            let line: String = row.into_iter().collect();
            output.push_str(line.trim_end());
            output.push('\n');
        }

        output
    }

    pub fn format_tick(summary: &TickSummary) -> String {
        format!(
            "Generation {:>4}: {:>4} alive (+{} / -{})",
            summary.generation, summary.alive, summary.born, summary.died
        )
    }

    pub fn format_resize(report: &ResizeReport) -> String {
        format!(
            "Resized {} -> {}: +{} / -{} cells in {:.3}ms",
            report.from,
            report.to,
            report.added,
            report.removed,
            report.elapsed.as_secs_f64() * 1000.0
        )
    }

    pub fn format_load_report(report: &LoadReport) -> String {
        let mut output = format!("Loaded {} cell(s)", report.applied);
        if report.out_of_grid > 0 {
            output.push_str(&format!(", {} outside the grid", report.out_of_grid));
        }
        if !report.malformed.is_empty() {
            output.push_str(&format!(", skipped malformed {:?}", report.malformed));
        }
        if let Some(ref dangling) = report.dangling {
            output.push_str(&format!(", ignored unpaired '{}'", dangling));
        }
        output
    }
}

/// ANSI styling for CLI status lines.
///
/// Decided once per process: `NO_COLOR` or a dumb terminal turn it off, and
/// tests use [`ColorOutput::plain`] so output is predictable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOutput {
    enabled: bool,
}

impl ColorOutput {
    pub fn detect() -> Self {
        let dumb_terminal = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none() && !dumb_terminal,
        }
    }

    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn paint(self, text: &str, color: Color) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    pub fn success(self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn warning(self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn info(self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    /// A failed command, with its whole context chain on one line
    pub fn error(self, error: &anyhow::Error) -> String {
        self.paint(&format!("Error: {:#}", error), Color::Red)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
