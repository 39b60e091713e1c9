//! Initial-grid loading.
//!
//! The record is up to four lines of up to four comma-separated integers.
//! Anything that does not parse, and anything missing, reads as an empty cell:
//! loading never fails.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::engine::{Grid, SIZE};

/// Supplies the grid a session starts from.
pub trait BoardSource {
    fn load(&mut self) -> Grid;
}

/// A fixed grid is its own source.
impl BoardSource for Grid {
    fn load(&mut self) -> Grid {
        *self
    }
}

/// Reads the starting grid from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvBoardSource {
    path: PathBuf,
}

impl CsvBoardSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardSource for CsvBoardSource {
    fn load(&mut self) -> Grid {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_grid(&text),
            Err(e) => {
                debug!("no starting grid at {}: {e}; using an empty grid", self.path.display());
                Grid::EMPTY
            }
        }
    }
}

/// Parse CSV text into a grid. Extra rows/columns are ignored.
///
/// ```
/// use slide_2048::source::parse_grid;
/// let g = parse_grid("2,2,x\n\n0,4\n");
/// assert_eq!(g.rows()[0], [2, 2, 0, 0]);
/// assert_eq!(g.rows()[1], [0, 0, 0, 0]);
/// assert_eq!(g.rows()[2], [0, 4, 0, 0]);
/// ```
pub fn parse_grid(text: &str) -> Grid {
    let mut grid = Grid::EMPTY;
    for (r, line) in text.lines().take(SIZE).enumerate() {
        if line.is_empty() {
            continue;
        }
        for (c, cell) in line.split(',').take(SIZE).enumerate() {
            grid.set(r, c, parse_cell(cell));
        }
    }
    grid
}

/// Leading integer of `cell`, like C's `stoi`: leading whitespace is skipped,
/// an optional sign is accepted and parsing stops at the first non-digit.
/// No digits, a negative value or an overflow all read as 0.
fn parse_cell(cell: &str) -> u64 {
    let rest = cell.trim_start();
    let (negative, digits) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if negative {
        return 0;
    }
    digits[..end].parse().unwrap_or(0)
}
