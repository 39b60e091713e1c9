use rand::Rng;
use std::fmt;

use super::ops;

pub(crate) type Tile = u64;
pub(crate) type Score = u64;

/// Side length of the grid. Rows and columns are always this long.
pub const SIZE: usize = 4;

/// One row or one materialized column, read in grid order.
pub type Line = [Tile; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every direction, in the order the command keys are listed (w, s, a, d).
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Map a command key to a direction: `w` up, `a` left, `s` down, `d` right.
    pub fn from_key(key: char) -> Option<Move> {
        match key {
            'w' => Some(Move::Up),
            'a' => Some(Move::Left),
            's' => Some(Move::Down),
            'd' => Some(Move::Right),
            _ => None,
        }
    }

    /// Left/Right act on rows, Up/Down on columns.
    #[inline]
    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, Move::Left | Move::Right)
    }

    /// Right/Down reduce the reversed line and reverse the result back.
    #[inline]
    pub(crate) fn is_reversed(self) -> bool {
        matches!(self, Move::Right | Move::Down)
    }
}

/// A 4x4 grid of tile values, row-major. `0` is an empty cell.
///
/// `Grid` is a plain `Copy` value: every copy is an independent snapshot, so
/// holding one (e.g. in undo history) never aliases the live board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(pub(crate) [[Tile; SIZE]; SIZE]);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Construct a `Grid` from row-major cell values.
    #[inline]
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        Grid(rows)
    }

    /// Consume this `Grid`, returning its rows.
    #[inline]
    pub fn into_rows(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// Borrow the rows of this `Grid`.
    #[inline]
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] {
        &self.0
    }

    /// Value at (`row`, `col`). Panics when either index is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Overwrite the value at (`row`, `col`). Panics when either index is out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.0[row][col] = value;
    }

    /// Iterate over all cell values in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.0.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if tile == 0 {
                    empty.push((r, c));
                }
            }
        }
        empty
    }

    /// Count the number of empty cells on the grid.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells().filter(|&t| t == 0).count()
    }

    /// Sum of every cell on the grid.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);
    /// assert_eq!(g.score(), 8);
    /// ```
    #[inline]
    pub fn score(self) -> Score {
        ops::get_score(self)
    }

    /// Slide/merge every line in `dir` (no random insert).
    ///
    /// Returns the new grid and whether any cell changed.
    ///
    /// ```
    /// use slide_2048::engine::{Grid, Move};
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let (next, changed) = g.shift(Move::Left);
    /// assert!(changed);
    /// assert_eq!(next.rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> (Self, bool) {
        ops::shift(self, dir)
    }

    /// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell, using the provided RNG.
    ///
    /// A full grid is returned unchanged.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::spawn_tile(self, rng)
    }

    /// Shift in `direction`, then insert a random tile if the shift changed the grid.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        match self.shift(direction) {
            (moved, true) => moved.with_random_tile(rng),
            (_, false) => self,
        }
    }

    /// Copy row `idx` or column `idx` out of the grid, depending on `dir`.
    #[inline]
    pub(crate) fn line(&self, dir: Move, idx: usize) -> Line {
        if dir.is_horizontal() {
            self.0[idx]
        } else {
            [self.0[0][idx], self.0[1][idx], self.0[2][idx], self.0[3][idx]]
        }
    }

    /// Write `line` back at row `idx` or column `idx`, depending on `dir`.
    #[inline]
    pub(crate) fn set_line(&mut self, dir: Move, idx: usize, line: Line) {
        if dir.is_horizontal() {
            self.0[idx] = line;
        } else {
            for (row, tile) in self.0.iter_mut().zip(line) {
                row[idx] = tile;
            }
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

/// Tab-separated rows, `.` for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for &tile in row {
                if tile == 0 {
                    write!(f, ".\t")?;
                } else {
                    write!(f, "{}\t", tile)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
