//! Engine module: the 4x4 grid, line reduction, directional shifts and tile spawning.
//!
//! - `Grid` is a `Copy` value with the useful methods (`shift`, `with_random_tile`, `score`).
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - Line-level compaction/merging lives in `line`; the whole-grid ops in `ops`.

pub mod line;
mod ops;
pub mod state;

pub use line::{compact, merge, reduce, reduce_towards};
pub use ops::{get_score, shift, spawn_tile};
pub use state::{Grid, Line, Move, SIZE};
