//! Single-line compaction and merging.
//!
//! Every directional move is built from [`reduce`] applied to four lines.
//! The functions here only know "towards index 0"; Right/Down callers reverse
//! the line before and after (see [`reduce_towards`]).

use super::state::{Line, Move, SIZE};

/// Remove zeros, keep the order of the remaining tiles, pad with zeros on the right.
pub fn compact(line: Line) -> Line {
    let mut out = [0; SIZE];
    for (slot, tile) in out.iter_mut().zip(line.into_iter().filter(|&t| t != 0)) {
        *slot = tile;
    }
    out
}

/// Merge equal non-zero neighbours, left to right, once per pair.
///
/// The left cell doubles and the right cell becomes empty. A cell that was
/// consumed by a merge is skipped, so `[2, 2, 2, 2]` yields `[4, 0, 4, 0]`.
pub fn merge(mut line: Line) -> Line {
    let mut idx = 0;
    while idx + 1 < SIZE {
        if line[idx] != 0 && line[idx] == line[idx + 1] {
            line[idx] = line[idx].saturating_mul(2);
            line[idx + 1] = 0;
            idx += 2;
        } else {
            idx += 1;
        }
    }
    line
}

/// `compact(merge(compact(line)))`: one full slide towards index 0.
#[inline]
pub fn reduce(line: Line) -> Line {
    compact(merge(compact(line)))
}

/// [`reduce`] in the direction of `dir`, with the line given in grid order.
#[inline]
pub fn reduce_towards(mut line: Line, dir: Move) -> Line {
    if dir.is_reversed() {
        line.reverse();
        let mut out = reduce(line);
        out.reverse();
        out
    } else {
        reduce(line)
    }
}
