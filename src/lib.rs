//! slide-2048: the transition engine of a 4x4 sliding-tile merge puzzle.
//!
//! This crate provides:
//! - A `Grid` value type with `shift`, `with_random_tile` and `score` (`engine` module)
//! - Line compaction/merging used by every move (`engine::line`)
//! - Undo history of grid snapshots (`history`)
//! - A `Session` that turns commands into transitions and log records (`controller`)
//! - The CSV transition log and its reader (`trace`)
//! - Starting-grid loading from CSV (`source`) and TOML settings (`config`)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Grid, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let (g1, changed) = g0.shift(Move::Left);
//! assert_eq!(g1.score(), g0.score());
//! if changed {
//!     let _g2 = g1.with_random_tile(&mut rng);
//! }
//! ```
//!
//! Full session, logging to memory:
//! ```
//! use slide_2048::controller::{parse_commands, Session, DEFAULT_SEED};
//! use slide_2048::engine::Grid;
//! use slide_2048::trace::MemoryLog;
//!
//! let mut start = Grid::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
//! let mut session = Session::start(&mut start, MemoryLog::new(), DEFAULT_SEED);
//! session.run(parse_commands("a d u q"));
//! assert!(session.log().to_csv().starts_with("initial,2,0,0,2,"));
//! ```
//!
pub mod config;
pub mod controller;
pub mod engine;
pub mod history;
pub mod source;
pub mod trace;
