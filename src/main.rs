//! Ring Shift Puzzle Solver
//!
//! Reads a 5x5 board of the values 1 through 25 from a text file and prints a
//! sequence of row, column and ring moves that restores row-major order. Also
//! generates random solvable boards and replays move sequences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ringshift::heuristic::DEFAULT_DEPTH_PENALTY;
use ringshift::moves::{apply_labels, format_moves, scramble};
use ringshift::{search, Board, Move, SearchConfig};

/// Expansions between progress message updates.
const PROGRESS_INTERVAL: usize = 1024;

/// Solves the 5x5 ring shift puzzle.
#[derive(Parser)]
#[command(name = "ringshift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the board stored in a file.
    Solve {
        /// File holding 25 whitespace-separated values in row-major order.
        board: PathBuf,
        /// Weight of the squared path length in the evaluation score.
        #[arg(long, default_value_t = DEFAULT_DEPTH_PENALTY)]
        depth_penalty: f64,
        /// Give up after expanding this many boards.
        #[arg(long)]
        max_expansions: Option<usize>,
        /// Hide the progress spinner.
        #[arg(long)]
        no_progress: bool,
    },
    /// Print a random solvable board.
    Scramble {
        /// Number of random moves applied to the solved board.
        #[arg(long, default_value_t = 20)]
        moves: usize,
        /// Seed for a reproducible scramble.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply moves to a board and report whether it ends solved.
    Apply {
        /// File holding 25 whitespace-separated values in row-major order.
        board: PathBuf,
        /// Move labels such as R1, U5, Oc or Icc.
        #[arg(required = true)]
        moves: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Solve {
            board,
            depth_penalty,
            max_expansions,
            no_progress,
        } => {
            let config = SearchConfig {
                depth_penalty,
                max_expansions,
            };
            run_solve(&board, &config, !no_progress)
        }
        Command::Scramble { moves, seed } => {
            run_scramble(moves, seed);
            Ok(())
        }
        Command::Apply { board, moves } => run_apply(&board, &moves),
    }
}

/// Installs the logger; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_board(path: &Path) -> Result<Board> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    text.parse::<Board>()
        .with_context(|| format!("Failed to parse board file {}", path.display()))
}

/// Solves the board in `path` and prints the moves.
fn run_solve(path: &Path, config: &SearchConfig, show_progress: bool) -> Result<()> {
    let start = read_board(path)?;
    println!("Start state:\n{start}\n");
    println!("Solving...");

    let progress = show_progress.then(new_spinner);
    let result = search(start, config, |stats| {
        if let Some(bar) = &progress {
            if stats.expanded % PROGRESS_INTERVAL == 0 {
                bar.set_message(format!(
                    "{} boards expanded, frontier peak {}",
                    stats.expanded, stats.max_frontier
                ));
            }
        }
    });
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let solution = result.context("No solution found")?;
    info!(
        "expanded {} boards, skipped {} duplicates, frontier peak {}",
        solution.stats.expanded, solution.stats.duplicates, solution.stats.max_frontier
    );
    println!("{}", format_solution(&solution.moves));
    Ok(())
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} [{elapsed}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Prints a random board `count` moves away from the goal.
fn run_scramble(count: usize, seed: Option<u64>) {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let moves = scramble(&mut rng, count);
    info!("scrambled with: {}", format_moves(&moves));
    println!("{}", Board::GOAL.apply_all(moves));
}

/// Replays labelled moves on the board in `path`.
fn run_apply(path: &Path, labels: &[String]) -> Result<()> {
    let start = read_board(path)?;
    let end = apply_labels(start, labels).context("Failed to apply moves")?;
    println!("{end}\n");
    println!("{}", if end.is_goal() { "Solved" } else { "Not solved" });
    Ok(())
}

/// Formats the move count and the space-joined labels.
fn format_solution(moves: &[Move]) -> String {
    format!(
        "Solution found in {} moves:\n{}",
        moves.len(),
        format_moves(moves)
    )
}
