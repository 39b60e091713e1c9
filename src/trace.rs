//! Transition log: one CSV record per grid transition.
//!
//! Each record is `stage,c00,c01,...,c33\n`: the stage label followed by the
//! 16 cells in row-major order, no trailing comma. The first append of a
//! session truncates the file; later appends extend it.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::engine::{Grid, SIZE};

const FIELDS: usize = 1 + SIZE * SIZE;

/// Why a record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Initial,
    Merge,
    Spawn,
    Invalid,
    Undo,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initial => "initial",
            Stage::Merge => "merge",
            Stage::Spawn => "spawn",
            Stage::Invalid => "invalid",
            Stage::Undo => "undo",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Stage::Initial),
            "merge" => Ok(Stage::Merge),
            "spawn" => Ok(Stage::Spawn),
            "invalid" => Ok(Stage::Invalid),
            "undo" => Ok(Stage::Undo),
            other => Err(TraceError::UnknownStage(other.to_string())),
        }
    }
}

/// A tagged grid snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub stage: Stage,
    pub grid: Grid,
}

impl Record {
    pub fn new(stage: Stage, grid: Grid) -> Self {
        Self { stage, grid }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unknown stage label {0:?}")]
    UnknownStage(String),
    #[error("expected 17 fields, found {0}")]
    FieldCount(usize),
    #[error("cell {0:?} is not a non-negative integer")]
    Cell(String),
}

/// Serialize one record, including the trailing newline.
pub fn encode_record(record: &Record) -> String {
    let mut out = String::with_capacity(64);
    out.push_str(record.stage.as_str());
    for tile in record.grid.cells() {
        out.push(',');
        out.push_str(&tile.to_string());
    }
    out.push('\n');
    out
}

/// Parse one record line (with or without its newline).
pub fn parse_record(line: &str) -> Result<Record, TraceError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    if fields.len() != FIELDS {
        return Err(TraceError::FieldCount(fields.len()));
    }
    let stage: Stage = fields[0].parse()?;
    let mut grid = Grid::EMPTY;
    for (idx, cell) in fields[1..].iter().enumerate() {
        let value = cell.parse().map_err(|_| TraceError::Cell(cell.to_string()))?;
        grid.set(idx / SIZE, idx % SIZE, value);
    }
    Ok(Record { stage, grid })
}

/// Parse a whole log, skipping blank lines.
pub fn parse_log(text: &str) -> Result<Vec<Record>, TraceError> {
    text.lines().filter(|l| !l.trim().is_empty()).map(parse_record).collect()
}

pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, TraceError> {
    let text = fs::read_to_string(path)?;
    parse_log(&text)
}

/// Append-only sink for transition records.
pub trait TransitionLog {
    fn append(&mut self, record: &Record) -> Result<(), TraceError>;
}

/// File-backed CSV log. The file is reopened for every record.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
    first: bool,
}

impl CsvLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), first: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransitionLog for CsvLog {
    fn append(&mut self, record: &Record) -> Result<(), TraceError> {
        // Spent on the first attempt even if the open below fails.
        let truncate = std::mem::replace(&mut self.first, false);
        let mut options = OpenOptions::new();
        if truncate {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true).create(true);
        }
        let mut f = options.open(&self.path)?;
        f.write_all(encode_record(record).as_bytes())?;
        Ok(())
    }
}

/// In-memory log, mostly for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Vec<Record>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The exact bytes a `CsvLog` would have written.
    pub fn to_csv(&self) -> String {
        self.records.iter().map(encode_record).collect()
    }
}

impl TransitionLog for MemoryLog {
    fn append(&mut self, record: &Record) -> Result<(), TraceError> {
        self.records.push(*record);
        Ok(())
    }
}
