//! Alive-string codec and file I/O for hex patterns
//!
//! The alive-string is the only persisted form of a grid: a list of `x,y`
//! pairs. Output separates pairs with a single space; input accepts any mix of
//! `,` `;` space and newline between numbers.

use super::coord::HexCoord;
use super::grid::Grid;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const DELIMITERS: [char; 4] = [',', ';', ' ', '\n'];

/// Render the alive-set of a grid, in creation order
pub fn alive_string(grid: &Grid) -> String {
    grid.cells()
        .filter(|cell| cell.is_alive())
        .map(|cell| cell.coord())
        .join(" ")
}

/// Result of tokenizing an alive-string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAliveString {
    pub pairs: Vec<HexCoord>,
    /// Tokens that are not integers; the pair they belong to is dropped
    pub malformed: Vec<String>,
    /// Pairs dropped because of a malformed token, valid partners included
    pub skipped_pairs: usize,
    /// Trailing token with no partner
    pub dangling: Option<String>,
}

/// Split on the accepted delimiters and group tokens positionally into pairs.
///
/// A pair with a malformed token is skipped as a whole so that later pairs keep
/// their alignment.
pub fn parse_alive_string(text: &str) -> ParsedAliveString {
    let tokens: Vec<&str> = text
        .split(DELIMITERS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    let mut parsed = ParsedAliveString::default();
    let pairs = tokens.chunks_exact(2);
    parsed.dangling = pairs.remainder().first().map(|token| token.to_string());

    for pair in pairs {
        let (x_token, y_token) = (pair[0], pair[1]);
        match (x_token.parse::<i32>(), y_token.parse::<i32>()) {
            (Ok(x), Ok(y)) => parsed.pairs.push(HexCoord::new(x, y)),
            (x, y) => {
                parsed.skipped_pairs += 1;
                if x.is_err() {
                    parsed.malformed.push(x_token.to_string());
                }
                if y.is_err() {
                    parsed.malformed.push(y_token.to_string());
                }
            }
        }
    }
    parsed
}

/// What happened while loading an alive-string into a grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Pairs that named an existing cell
    pub applied: usize,
    /// Well-formed pairs outside the grid, ignored
    pub out_of_grid: usize,
    pub malformed: Vec<String>,
    pub skipped_pairs: usize,
    pub dangling: Option<String>,
}

impl LoadReport {
    /// Whether every token of the input was used or knowingly ignored
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.dangling.is_none()
    }

    /// Tokens that did not end up in a pair: both halves of every dropped
    /// pair plus the dangling one
    pub fn skipped_tokens(&self) -> usize {
        2 * self.skipped_pairs + usize::from(self.dangling.is_some())
    }
}

/// Clear the grid, then set every listed in-grid cell alive
pub fn apply_alive_string(grid: &mut Grid, text: &str) -> LoadReport {
    let parsed = parse_alive_string(text);
    grid.clear();

    let mut report = LoadReport {
        malformed: parsed.malformed,
        skipped_pairs: parsed.skipped_pairs,
        dangling: parsed.dangling,
        ..LoadReport::default()
    };
    for coord in parsed.pairs {
        match grid.set_alive(coord, true) {
            Ok(()) => report.applied += 1,
            Err(_) => report.out_of_grid += 1,
        }
    }

    if !report.is_clean() {
        warn!(
            malformed = ?report.malformed,
            skipped = report.skipped_tokens(),
            dangling = ?report.dangling,
            "skipped unparsable tokens in alive-string"
        );
    }
    report
}

/// Serializable view of a session, for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: u32,
    pub generation: u64,
    pub rules: String,
    pub alive: Vec<(i32, i32)>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The alive-set in alive-string form
    pub fn alive_string(&self) -> String {
        self.alive.iter().map(|(x, y)| format!("{},{}", x, y)).join(" ")
    }
}

/// Read an alive-string from a text file
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pattern file: {}", path.as_ref().display()))
}

/// Write a grid's alive-string to a text file
pub fn save_pattern_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    write_creating_parents(path.as_ref(), &(alive_string(grid) + "\n"))
}

pub fn save_snapshot_to_file<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> Result<()> {
    let json = snapshot.to_json().context("Failed to serialize snapshot")?;
    write_creating_parents(path.as_ref(), &json)
}

/// Create example pattern files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Three mutually adjacent cells around the origin
    std::fs::write(dir.join("triple.txt"), "0,0 1,0 0,1\n").context("Failed to write triple.txt")?;

    // Two cells sharing two dead neighbours; flips between two orientations
    std::fs::write(dir.join("pair.txt"), "1,0 0,1\n").context("Failed to write pair.txt")?;

    // Full first ring around a dead origin
    std::fs::write(dir.join("ring.txt"), "0,1\n0,-1\n1,0\n-1,0\n1,1\n-1,-1\n")
        .context("Failed to write ring.txt")?;

    Ok(())
}

fn write_creating_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn grid_with(size: u32, alive: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        for &coord in alive {
            grid.set_alive(coord.into(), true).unwrap();
        }
        grid
    }

    #[test]
    fn test_alive_string_follows_creation_order() {
        let grid = grid_with(4, &[(1, 0), (0, 1)]);
        assert_eq!(alive_string(&grid), "0,1 1,0");
        assert_eq!(alive_string(&Grid::new(4).unwrap()), "");
    }

    #[test]
    fn test_parse_mixed_delimiters() {
        let parsed = parse_alive_string("1,0;0,1\n-2 3,,;  4,-1\r\n");
        assert_eq!(
            parsed.pairs,
            vec![HexCoord::new(1, 0), HexCoord::new(0, 1), HexCoord::new(-2, 3), HexCoord::new(4, -1)]
        );
        assert!(parsed.malformed.is_empty());
        assert_eq!(parsed.dangling, None);
    }

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let parsed = parse_alive_string("1,0 a,2 0,1 3,1.5 7");
        assert_eq!(parsed.pairs, vec![HexCoord::new(1, 0), HexCoord::new(0, 1)]);
        assert_eq!(parsed.malformed, vec!["a".to_string(), "1.5".to_string()]);
        assert_eq!(parsed.skipped_pairs, 2);
        assert_eq!(parsed.dangling, Some("7".to_string()));
    }

    #[test]
    fn test_apply_clears_and_ignores_out_of_grid() {
        let mut grid = grid_with(4, &[(0, 0), (2, 2)]);
        let report = apply_alive_string(&mut grid, "1,0 0,1 9,9 3,-1");
        assert_eq!(report.applied, 2);
        assert_eq!(report.out_of_grid, 2);
        assert!(report.is_clean());
        assert_eq!(grid.alive_coords(), vec![HexCoord::new(0, 1), HexCoord::new(1, 0)]);
    }

    #[test]
    fn test_apply_empty_text_clears_grid() {
        let mut grid = grid_with(3, &[(0, 0)]);
        let report = apply_alive_string(&mut grid, "");
        assert_eq!(report, LoadReport::default());
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_apply_reports_skipped_tokens() {
        let mut grid = Grid::new(4).unwrap();
        let report = apply_alive_string(&mut grid, "x,y 1,1 2");
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped_tokens(), 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_valid_partner_of_malformed_token_counts_as_skipped() {
        let mut grid = Grid::new(4).unwrap();
        let report = apply_alive_string(&mut grid, "a,2");
        assert_eq!(report.malformed, vec!["a".to_string()]);
        assert_eq!(report.skipped_pairs, 1);
        assert_eq!(report.skipped_tokens(), 2);
        assert_eq!(grid.alive_count(), 0);

        let report = apply_alive_string(&mut grid, "1,0 0,b c,d");
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped_tokens(), 4);
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = Snapshot {
            size: 3,
            generation: 4,
            rules: "B2/S35".to_string(),
            alive: vec![(0, 1), (1, 0)],
        };
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"generation\": 4"));
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
        assert_eq!(snapshot.alive_string(), "0,1 1,0");
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested/pattern.txt");

        let original = grid_with(4, &[(-1, 0), (2, 1)]);
        save_pattern_to_file(&original, &path).unwrap();

        let text = load_pattern_from_file(&path).unwrap();
        let mut loaded = Grid::new(4).unwrap();
        apply_alive_string(&mut loaded, &text);
        assert_eq!(loaded.alive_coords(), original.alive_coords());
    }

    #[test]
    fn test_example_patterns() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();
        for name in ["triple.txt", "pair.txt", "ring.txt"] {
            let text = load_pattern_from_file(temp_dir.path().join(name)).unwrap();
            assert!(parse_alive_string(&text).malformed.is_empty(), "{name}");
        }
        assert!(load_pattern_from_file(temp_dir.path().join("missing.txt")).is_err());
    }
}
