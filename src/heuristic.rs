//! Manhattan-distance estimate and the evaluation score used by the search.
//!
//! The estimate is not admissible for this puzzle: a single move displaces up
//! to 16 values at once. It only ranks boards, it never bounds path length.

use crate::board::{cell_coord, Board, CELL_COUNT};

/// Penalty applied per squared step of path length.
pub const DEFAULT_DEPTH_PENALTY: f64 = 0.2;

/// Distance from each cell to the goal cell of each value, indexed by
/// `[cell][value - 1]`.
type CellMetric = [[u8; CELL_COUNT]; CELL_COUNT];

const fn manhattan_metric() -> CellMetric {
    let mut metric = [[0u8; CELL_COUNT]; CELL_COUNT];
    let mut cell = 0;
    while cell < CELL_COUNT {
        let (row, col) = cell_coord(cell);
        let mut home = 0;
        while home < CELL_COUNT {
            let (home_row, home_col) = cell_coord(home);
            metric[cell][home] = (row.abs_diff(home_row) + col.abs_diff(home_col)) as u8;
            home += 1;
        }
        cell += 1;
    }
    metric
}

static METRIC: CellMetric = manhattan_metric();

/// Sum of the Manhattan distances of every value from its goal cell.
///
/// Value `v` belongs at row `(v - 1) / 5`, column `(v - 1) % 5`. Zero exactly
/// when the board is solved.
#[inline]
pub fn heuristic(board: &Board) -> u32 {
    board
        .cells()
        .iter()
        .enumerate()
        .map(|(cell, &value)| u32::from(METRIC[cell][value as usize - 1]))
        .sum()
}

/// Ranking score of a board reached after `cost` moves.
///
/// The squared cost term grows faster than the heuristic can shrink, which
/// pulls the search back towards shallow paths.
#[inline]
pub fn evaluate(board: &Board, cost: u32, depth_penalty: f64) -> f64 {
    f64::from(heuristic(board)) + depth_penalty * f64::from(cost * cost)
}
