//! Transition controller: turns commands into grid transitions and log records.
//!
//! | command        | effect                                   | records            |
//! |----------------|------------------------------------------|--------------------|
//! | startup        | load the starting grid                   | `initial`          |
//! | `w`/`a`/`s`/`d`| shift; if it changed, push + spawn        | `merge`, `spawn`   |
//! |                | shift did nothing                        | `invalid`          |
//! | `u`            | restore the last snapshot, if any        | `undo` / nothing   |
//! | `q`            | stop                                     | nothing            |
//! | anything else  | nothing moves                            | `invalid`          |
//!
//! ```
//! use slide_2048::controller::{Command, Outcome, Session};
//! use slide_2048::engine::Grid;
//! use slide_2048::trace::{MemoryLog, Stage};
//!
//! let mut start = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut session = Session::start(&mut start, MemoryLog::new(), 42);
//! assert!(matches!(session.apply(Command::from_key('a')), Outcome::Moved(_)));
//! assert_eq!(session.apply(Command::Undo), Outcome::Undone);
//! assert_eq!(session.grid(), start);
//!
//! let stages: Vec<Stage> = session.log().records().iter().map(|r| r.stage).collect();
//! assert_eq!(stages, [Stage::Initial, Stage::Merge, Stage::Spawn, Stage::Undo]);
//! ```

use std::io::{self, BufRead};

use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::engine::{self, Grid, Move};
use crate::history::History;
use crate::source::BoardSource;
use crate::trace::{Record, Stage, TransitionLog};

/// Seed used when nothing else is configured.
pub const DEFAULT_SEED: u64 = 42;

/// One player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Undo,
    Quit,
    /// Any other key. Handled like a move that changes nothing.
    Unknown(char),
}

impl Command {
    pub fn from_key(key: char) -> Command {
        match key {
            'u' => Command::Undo,
            'q' => Command::Quit,
            other => Move::from_key(other).map_or(Command::Unknown(other), Command::Move),
        }
    }
}

/// Split free-form input into commands, one per non-whitespace character.
pub fn parse_commands(input: &str) -> impl Iterator<Item = Command> + '_ {
    input.chars().filter(|c| !c.is_whitespace()).map(Command::from_key)
}

/// Like [`parse_commands`] over raw input bytes. Bytes that are not keys,
/// including non-ASCII ones, become [`Command::Unknown`].
pub fn parse_command_bytes(input: &[u8]) -> impl Iterator<Item = Command> + '_ {
    input
        .iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|&b| Command::from_key(char::from(b)))
}

/// What `Session::apply` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The grid changed in this direction and a tile was spawned.
    Moved(Move),
    /// Nothing changed (blocked move or unknown key).
    Invalid,
    Undone,
    /// Undo with empty history. No record is written.
    NothingToUndo,
    Quit,
}

/// A single play session: live grid, undo history, log sink and spawn RNG.
///
/// The RNG is seeded once when the session starts and never reseeded, so
/// the same starting grid, seed and commands always produce the same log.
pub struct Session<L, R = StdRng> {
    grid: Grid,
    history: History,
    log: L,
    rng: R,
}

impl<L: TransitionLog> Session<L, StdRng> {
    /// Load the starting grid, seed the spawn RNG and write the `initial` record.
    pub fn start<S: BoardSource + ?Sized>(source: &mut S, log: L, seed: u64) -> Self {
        debug!("starting session with seed {seed}");
        Self::with_rng(source, log, StdRng::seed_from_u64(seed))
    }
}

impl<L: TransitionLog, R: Rng> Session<L, R> {
    /// Like [`Session::start`] with a caller-provided RNG.
    pub fn with_rng<S: BoardSource + ?Sized>(source: &mut S, log: L, rng: R) -> Self {
        let grid = source.load();
        let mut session = Self { grid, history: History::new(), log, rng };
        session.emit(Stage::Initial);
        session
    }

    /// Process one command to completion, including its log records.
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Move(dir) => self.apply_move(dir),
            Command::Undo => match self.history.pop() {
                Some(prev) => {
                    self.grid = prev;
                    self.emit(Stage::Undo);
                    Outcome::Undone
                }
                None => {
                    debug!("undo with empty history");
                    Outcome::NothingToUndo
                }
            },
            Command::Quit => Outcome::Quit,
            Command::Unknown(key) => {
                debug!("unknown command {key:?}");
                self.emit(Stage::Invalid);
                Outcome::Invalid
            }
        }
    }

    /// Apply commands in order until one of them is `Quit` or the input runs out.
    ///
    /// Returns how many commands were processed, counting the `Quit`.
    pub fn run<I: IntoIterator<Item = Command>>(&mut self, commands: I) -> usize {
        let mut processed = 0;
        for command in commands {
            processed += 1;
            if self.apply(command) == Outcome::Quit {
                break;
            }
        }
        processed
    }

    /// Read commands line by line from `input` until `Quit` or end of input.
    ///
    /// `on_outcome` sees the session after every command. Only an I/O error
    /// from `input` or from `on_outcome` ends the loop early.
    pub fn run_reader<B, F>(&mut self, mut input: B, mut on_outcome: F) -> io::Result<usize>
    where
        B: BufRead,
        F: FnMut(&Self, Command, Outcome) -> io::Result<()>,
    {
        let mut line = Vec::new();
        let mut processed = 0;
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                return Ok(processed);
            }
            for command in parse_command_bytes(&line) {
                processed += 1;
                let outcome = self.apply(command);
                on_outcome(self, command, outcome)?;
                if outcome == Outcome::Quit {
                    return Ok(processed);
                }
            }
        }
    }

    fn apply_move(&mut self, dir: Move) -> Outcome {
        let prev = self.grid;
        let (next, changed) = engine::shift(prev, dir);
        if !changed {
            self.emit(Stage::Invalid);
            return Outcome::Invalid;
        }
        self.history.push(prev);
        self.grid = next;
        self.emit(Stage::Merge);
        self.grid = engine::spawn_tile(self.grid, &mut self.rng);
        self.emit(Stage::Spawn);
        Outcome::Moved(dir)
    }

    fn emit(&mut self, stage: Stage) {
        let record = Record::new(stage, self.grid);
        debug!("{stage}: {:?}", self.grid);
        if let Err(e) = self.log.append(&record) {
            warn!("skipping {stage} record: {e}");
        }
    }
}

impl<L, R> Session<L, R> {
    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn score(&self) -> u64 {
        self.grid.score()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn into_log(self) -> L {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CsvBoardSource;
    use crate::trace::{read_log, CsvLog, MemoryLog, TraceError};
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    fn stages<R>(s: &Session<MemoryLog, R>) -> Vec<Stage> {
        s.log().records().iter().map(|r| r.stage).collect()
    }

    fn start(rows: [[u64; 4]; 4]) -> Session<MemoryLog> {
        let mut g = Grid::from_rows(rows);
        Session::start(&mut g, MemoryLog::new(), DEFAULT_SEED)
    }

    #[test]
    fn startup_writes_initial_record() {
        let s = start([[0, 0, 2, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(stages(&s), [Stage::Initial]);
        assert_eq!(s.log().records()[0].grid, s.grid());
        assert!(s.history().is_empty());
    }

    #[test]
    fn accepted_move_logs_merge_then_spawn() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(s.apply(Command::Move(Move::Left)), Outcome::Moved(Move::Left));
        assert_eq!(stages(&s), [Stage::Initial, Stage::Merge, Stage::Spawn]);

        let merged = s.log().records()[1].grid;
        assert_eq!(merged.rows()[0], [4, 0, 0, 0]);
        assert_eq!(merged.count_empty(), 15);

        let spawned = s.log().records()[2].grid;
        assert_eq!(spawned.count_empty(), 14);
        assert_eq!(spawned, s.grid());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn blocked_move_logs_invalid_and_keeps_history() {
        let mut s = start([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = s.grid();
        assert_eq!(s.apply(Command::Move(Move::Left)), Outcome::Invalid);
        assert_eq!(stages(&s), [Stage::Initial, Stage::Invalid]);
        assert_eq!(s.grid(), before);
        assert!(s.history().is_empty());
    }

    #[test]
    fn unknown_key_logs_invalid() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = s.grid();
        assert_eq!(s.apply(Command::from_key('x')), Outcome::Invalid);
        assert_eq!(stages(&s), [Stage::Initial, Stage::Invalid]);
        assert_eq!(s.log().records()[1].grid, before);
    }

    #[test]
    fn undo_restores_pre_move_grid() {
        let mut s = start([[2, 2, 0, 0], [0, 0, 4, 4], [0; 4], [0; 4]]);
        let before = s.grid();
        s.apply(Command::Move(Move::Right));
        assert_ne!(s.grid(), before);
        assert_eq!(s.apply(Command::Undo), Outcome::Undone);
        assert_eq!(s.grid(), before);
        assert!(s.history().is_empty());
        let last = s.log().records().last().copied().unwrap();
        assert_eq!(last.stage, Stage::Undo);
        assert_eq!(last.grid, before);
    }

    #[test]
    fn undo_walks_back_several_moves() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let g0 = s.grid();
        s.apply(Command::Move(Move::Left));
        let g1 = s.grid();
        s.apply(Command::Move(Move::Right));
        assert_eq!(s.history().len(), 2);
        s.apply(Command::Undo);
        assert_eq!(s.grid(), g1);
        s.apply(Command::Undo);
        assert_eq!(s.grid(), g0);
    }

    #[test]
    fn undo_on_empty_history_is_silent() {
        let mut s = start([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = s.grid();
        assert_eq!(s.apply(Command::Undo), Outcome::NothingToUndo);
        assert_eq!(s.grid(), before);
        assert_eq!(stages(&s), [Stage::Initial]);
    }

    #[test]
    fn run_stops_at_quit() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let processed = s.run(parse_commands("a x\nq d d"));
        assert_eq!(processed, 3);
        assert_eq!(stages(&s), [Stage::Initial, Stage::Merge, Stage::Spawn, Stage::Invalid]);
    }

    #[test]
    fn reader_treats_non_ascii_bytes_as_unknown_keys() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut seen = Vec::new();
        let processed = s
            .run_reader(&b"a\xffd\nd\nq\nd\n"[..], |_, cmd, outcome| {
                seen.push((cmd, outcome));
                Ok(())
            })
            .unwrap();
        assert_eq!(processed, 5);
        assert_eq!(seen[1], (Command::Unknown('\u{ff}'), Outcome::Invalid));
        assert_eq!(seen[2].1, Outcome::Moved(Move::Right));
        assert_eq!(seen[4], (Command::Quit, Outcome::Quit));
        assert_eq!(
            stages(&s)[..6],
            [Stage::Initial, Stage::Merge, Stage::Spawn, Stage::Invalid, Stage::Merge, Stage::Spawn]
        );
    }

    #[test]
    fn reader_stops_at_end_of_input() {
        let mut s = start([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let processed = s.run_reader(&b"a \t x"[..], |_, _, _| Ok(())).unwrap();
        assert_eq!(processed, 2);
        assert_eq!(stages(&s), [Stage::Initial, Stage::Merge, Stage::Spawn, Stage::Invalid]);
    }

    #[test]
    fn command_keys() {
        assert_eq!(Command::from_key('w'), Command::Move(Move::Up));
        assert_eq!(Command::from_key('s'), Command::Move(Move::Down));
        assert_eq!(Command::from_key('u'), Command::Undo);
        assert_eq!(Command::from_key('q'), Command::Quit);
        assert_eq!(Command::from_key('W'), Command::Unknown('W'));
        let cmds: Vec<Command> = parse_commands(" w\ta\n").collect();
        assert_eq!(cmds, [Command::Move(Move::Up), Command::Move(Move::Left)]);
    }

    #[test]
    fn same_seed_same_commands_same_log() {
        let script = "wasdwasdaaaassssdddduwwwwuuxdsaw";
        let run = || {
            let mut s = start([[2, 0, 0, 2], [0, 4, 0, 0], [0; 4], [2, 0, 0, 0]]);
            s.run(parse_commands(script));
            s.into_log().to_csv()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn different_seeds_diverge() {
        let script = "wasdwasdwasdwasd";
        let run = |seed| {
            let mut g = Grid::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
            let mut s = Session::start(&mut g, MemoryLog::new(), seed);
            s.run(parse_commands(script));
            s.into_log().to_csv()
        };
        assert_ne!(run(1), run(2));
    }

    #[test]
    fn file_backed_session_is_byte_identical_across_runs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("game_input.csv");
        fs::write(&input, "2,2,0,0\n0,0,0,0\n0,4,4,0\n0,0,0,2\n").unwrap();

        let mut outputs = Vec::new();
        for name in ["a.csv", "b.csv"] {
            let out = dir.path().join(name);
            let mut src = CsvBoardSource::new(&input);
            let mut s = Session::start(&mut src, CsvLog::new(&out), DEFAULT_SEED);
            s.run(parse_commands("adwsuaq"));
            outputs.push(fs::read(&out).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);

        let records = read_log(dir.path().join("a.csv")).unwrap();
        assert_eq!(records[0].stage, Stage::Initial);
        assert_eq!(records[0].grid.rows()[2], [0, 4, 4, 0]);
    }

    struct BrokenLog;

    impl TransitionLog for BrokenLog {
        fn append(&mut self, _record: &Record) -> Result<(), TraceError> {
            Err(TraceError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }
    }

    #[test]
    fn unwritable_log_does_not_stop_play() {
        let mut g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut s = Session::start(&mut g, BrokenLog, DEFAULT_SEED);
        assert_eq!(s.apply(Command::Move(Move::Left)), Outcome::Moved(Move::Left));
        assert_eq!(s.grid().get(0, 0), 4);
        assert_eq!(s.apply(Command::Undo), Outcome::Undone);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        let tile = prop_oneof![3 => Just(0u64), 2 => (1u32..8).prop_map(|e| 1u64 << e)];
        prop::array::uniform4(prop::array::uniform4(tile)).prop_map(Grid::from_rows)
    }

    proptest! {
        #[test]
        fn undo_round_trips_any_accepted_move(g in arb_grid(), key in prop::sample::select(vec!['w', 'a', 's', 'd'])) {
            let mut start = g;
            let mut s = Session::start(&mut start, MemoryLog::new(), DEFAULT_SEED);
            if let Outcome::Moved(_) = s.apply(Command::from_key(key)) {
                prop_assert_eq!(s.apply(Command::Undo), Outcome::Undone);
                prop_assert_eq!(s.grid(), g);
            } else {
                prop_assert_eq!(s.grid(), g);
                prop_assert!(s.history().is_empty());
            }
        }
    }
}
