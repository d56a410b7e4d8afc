//! Ring Shift Puzzle Solver Library
//!
//! Solves a 5x5 puzzle holding the values 1 through 25 where a move shifts a
//! whole row or column cyclically, or rotates one of the two concentric rings.
//! The solver runs a best-first search ranked by Manhattan distance plus a
//! squared path-length penalty and returns the labels of the moves that
//! restore row-major order.
//!
//! ```
//! use ringshift::{solve, Board, Move};
//!
//! let start = Board::GOAL.apply(Move::OuterCw);
//! assert_eq!(solve(start).unwrap(), vec![Move::OuterCcw]);
//! ```

pub mod board;
pub mod heuristic;
pub mod moves;
pub mod solver;

pub use board::{Board, BoardError};
pub use moves::{Move, MoveParseError};
pub use solver::{search, solve, SearchConfig, SearchStats, Solution, SolveError};
