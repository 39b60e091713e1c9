use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use slide_2048::config::Config;
use slide_2048::controller::{Outcome, Session};
use slide_2048::engine::Grid;
use slide_2048::source::CsvBoardSource;
use slide_2048::trace::{self, CsvLog};

#[derive(Parser, Debug)]
#[command(name = "slide-2048", version, about = "Play the 4x4 merge puzzle and log every transition")]
struct Cli {
    /// TOML settings file (input, output, seed)
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Starting grid CSV (overrides the config file)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Transition log CSV (overrides the config file)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Spawn seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Read commands from stdin: w/a/s/d move, u undo, q quit (default)
    Play,
    /// Print every record of a transition log
    Replay {
        /// Log file to read (defaults to the configured output)
        log: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(input) = cli.input { config.input = input; }
    if let Some(output) = cli.output { config.output = output; }
    if let Some(seed) = cli.seed { config.seed = seed; }

    match cli.cmd.unwrap_or(Cmd::Play) {
        Cmd::Play => play(&config)?,
        Cmd::Replay { log } => replay(log.as_deref().unwrap_or(config.output.as_path()))?,
    }
    Ok(())
}

fn play(config: &Config) -> anyhow::Result<()> {
    info!(
        "input={} output={} seed={}",
        config.input.display(),
        config.output.display(),
        config.seed
    );
    let mut source = CsvBoardSource::new(&config.input);
    let mut session = Session::start(&mut source, CsvLog::new(&config.output), config.seed);

    let mut stdout = io::stdout();
    print_grid(&mut stdout, session.grid())?;
    prompt(&mut stdout)?;
    session.run_reader(io::stdin().lock(), |session, command, outcome| {
        info!("{command:?} -> {outcome:?}");
        match outcome {
            Outcome::Quit => Ok(()),
            Outcome::NothingToUndo => prompt(&mut stdout),
            _ => {
                print_grid(&mut stdout, session.grid())?;
                prompt(&mut stdout)
            }
        }
    })?;
    Ok(())
}

fn replay(path: &Path) -> anyhow::Result<()> {
    let records = trace::read_log(path)?;
    let mut stdout = io::stdout();
    for (idx, record) in records.iter().enumerate() {
        writeln!(stdout, "#{idx} {}", record.stage)?;
        print_grid(&mut stdout, record.grid)?;
    }
    Ok(())
}

fn print_grid<W: Write>(out: &mut W, grid: Grid) -> io::Result<()> {
    writeln!(out, "Score: {}", grid.score())?;
    write!(out, "{grid}")
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "Move (w=up, a=left, s=down, d=right), u=undo, q=quit: ")?;
    out.flush()
}
