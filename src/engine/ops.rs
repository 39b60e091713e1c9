use rand::Rng;

use super::line::reduce_towards;
use super::state::{Grid, Move, Score, Tile, SIZE};

/// Slide/merge every row or column of `grid` in `direction`. No randomness.
///
/// Returns the new grid and `true` iff at least one line differs cell-by-cell
/// from what it was before the reduction.
pub fn shift(grid: Grid, direction: Move) -> (Grid, bool) {
    let mut next = grid;
    let mut changed = false;
    for idx in 0..SIZE {
        let before = grid.line(direction, idx);
        let after = reduce_towards(before, direction);
        changed |= after != before;
        next.set_line(direction, idx, after);
    }
    (next, changed)
}

/// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
///
/// The position is drawn before the value. A grid with no empty cell is
/// returned as-is and the RNG is left untouched.
pub fn spawn_tile<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Grid {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return grid;
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let mut next = grid;
    next.set(row, col, generate_random_tile(rng));
    next
}

/// Sum of every cell.
pub fn get_score(grid: Grid) -> Score {
    grid.cells().sum()
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 {
        2
    } else {
        4
    }
}
