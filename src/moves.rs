//! Move definitions and successor generation.
//!
//! Every move shifts the values along one cyclic sequence of cells by a single
//! step. The sequences are the five rows, the five columns and the two
//! concentric rings, so the twelve move families reduce to one primitive.
//! Each of the 24 moves is compiled into a gather table at build time:
//! after a move, cell `i` holds the value previously at `table[i]`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::board::{cell_index, Board, BOARD_DIM, CELL_COUNT};

/// Number of distinct moves available from any board.
pub const MOVE_COUNT: usize = 24;

/// Moves contributed by the row (or column) family.
const LINE_MOVES: usize = 2 * BOARD_DIM;

/// Length of the longest cycle, the outer ring.
const MAX_CYCLE_LEN: usize = 4 * (BOARD_DIM - 1);

/// Labels in `Move::ALL` order.
const LABELS: [&str; MOVE_COUNT] = [
    "R1", "L1", "R2", "L2", "R3", "L3", "R4", "L4", "R5", "L5", //
    "U1", "D1", "U2", "D2", "U3", "D3", "U4", "D4", "U5", "D5", //
    "Oc", "Occ", "Ic", "Icc",
];

/// A single move. Row and column indices are zero-based and below 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Shift a row one cell right; the last value wraps to the front.
    RowRight(u8),
    /// Shift a row one cell left; the first value wraps to the back.
    RowLeft(u8),
    /// Shift a column one cell up; the top value wraps to the bottom.
    ColUp(u8),
    /// Shift a column one cell down; the bottom value wraps to the top.
    ColDown(u8),
    /// Rotate the 16 perimeter cells clockwise.
    OuterCw,
    /// Rotate the 16 perimeter cells counter-clockwise.
    OuterCcw,
    /// Rotate the 8 cells around the center clockwise.
    InnerCw,
    /// Rotate the 8 cells around the center counter-clockwise.
    InnerCcw,
}

/// Error returned when a label is not one of the 24 move labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown move label {0:?}")]
pub struct MoveParseError(pub String);

impl Move {
    /// Every move, in the order successors are generated.
    pub const ALL: [Move; MOVE_COUNT] = build_all();

    /// Position of this move in `Move::ALL`.
    ///
    /// # Panics
    ///
    /// Panics if a row or column index is 5 or more.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Move::RowRight(row) | Move::RowLeft(row) => {
                assert!((row as usize) < BOARD_DIM, "row index out of range");
                2 * row as usize + matches!(self, Move::RowLeft(_)) as usize
            }
            Move::ColUp(col) | Move::ColDown(col) => {
                assert!((col as usize) < BOARD_DIM, "column index out of range");
                LINE_MOVES + 2 * col as usize + matches!(self, Move::ColDown(_)) as usize
            }
            Move::OuterCw => 2 * LINE_MOVES,
            Move::OuterCcw => 2 * LINE_MOVES + 1,
            Move::InnerCw => 2 * LINE_MOVES + 2,
            Move::InnerCcw => 2 * LINE_MOVES + 3,
        }
    }

    const fn from_index(index: usize) -> Move {
        let line = ((index % LINE_MOVES) / 2) as u8;
        let first_of_pair = index % 2 == 0;
        if index < LINE_MOVES {
            if first_of_pair {
                Move::RowRight(line)
            } else {
                Move::RowLeft(line)
            }
        } else if index < 2 * LINE_MOVES {
            if first_of_pair {
                Move::ColUp(line)
            } else {
                Move::ColDown(line)
            }
        } else {
            match index - 2 * LINE_MOVES {
                0 => Move::OuterCw,
                1 => Move::OuterCcw,
                2 => Move::InnerCw,
                _ => Move::InnerCcw,
            }
        }
    }

    /// The canonical label, e.g. `"R2"`, `"U5"` or `"Icc"`.
    #[inline]
    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    /// The move that undoes this one.
    pub const fn inverse(self) -> Move {
        match self {
            Move::RowRight(row) => Move::RowLeft(row),
            Move::RowLeft(row) => Move::RowRight(row),
            Move::ColUp(col) => Move::ColDown(col),
            Move::ColDown(col) => Move::ColUp(col),
            Move::OuterCw => Move::OuterCcw,
            Move::OuterCcw => Move::OuterCw,
            Move::InnerCw => Move::InnerCcw,
            Move::InnerCcw => Move::InnerCw,
        }
    }

    /// Gather table for this move.
    #[inline(always)]
    pub(crate) fn permutation(self) -> &'static [u8; CELL_COUNT] {
        &MOVE_TABLES[self.index()]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LABELS
            .iter()
            .position(|&label| label == s)
            .map(Move::from_index)
            .ok_or_else(|| MoveParseError(s.to_owned()))
    }
}

const fn build_all() -> [Move; MOVE_COUNT] {
    let mut all = [Move::OuterCw; MOVE_COUNT];
    let mut index = 0;
    while index < MOVE_COUNT {
        all[index] = Move::from_index(index);
        index += 1;
    }
    all
}

/// An ordered cyclic sequence of cell indices.
#[derive(Clone, Copy)]
struct Cycle {
    cells: [u8; MAX_CYCLE_LEN],
    len: usize,
}

impl Cycle {
    const EMPTY: Cycle = Cycle {
        cells: [0; MAX_CYCLE_LEN],
        len: 0,
    };

    const fn push(mut self, row: usize, col: usize) -> Cycle {
        self.cells[self.len] = cell_index(row, col) as u8;
        self.len += 1;
        self
    }
}

/// Cells of a row, left to right.
const fn row_cycle(row: usize) -> Cycle {
    let mut cycle = Cycle::EMPTY;
    let mut col = 0;
    while col < BOARD_DIM {
        cycle = cycle.push(row, col);
        col += 1;
    }
    cycle
}

/// Cells of a column, top to bottom.
const fn col_cycle(col: usize) -> Cycle {
    let mut cycle = Cycle::EMPTY;
    let mut row = 0;
    while row < BOARD_DIM {
        cycle = cycle.push(row, col);
        row += 1;
    }
    cycle
}

/// Boundary cells of the square sub-grid `radius` cells in from the edge,
/// clockwise from its top-left corner.
const fn ring_cycle(radius: usize) -> Cycle {
    let first = radius;
    let last = BOARD_DIM - 1 - radius;
    let mut cycle = Cycle::EMPTY;

    let mut col = first;
    while col <= last {
        cycle = cycle.push(first, col);
        col += 1;
    }
    let mut row = first + 1;
    while row <= last {
        cycle = cycle.push(row, last);
        row += 1;
    }
    let mut col = last;
    while col > first {
        col -= 1;
        cycle = cycle.push(last, col);
    }
    let mut row = last;
    while row > first + 1 {
        row -= 1;
        cycle = cycle.push(row, first);
    }
    cycle
}

/// Gather table shifting every value one step along `cycle`.
///
/// Forward moves the value at position `k` to position `k + 1`; backward
/// moves it to `k - 1`. Cells outside the cycle map to themselves.
const fn shift_table(cycle: Cycle, forward: bool) -> [u8; CELL_COUNT] {
    let mut table = [0u8; CELL_COUNT];
    let mut cell = 0;
    while cell < CELL_COUNT {
        table[cell] = cell as u8;
        cell += 1;
    }

    let mut k = 0;
    while k < cycle.len {
        let here = cycle.cells[k];
        let next = cycle.cells[(k + 1) % cycle.len];
        if forward {
            table[next as usize] = here;
        } else {
            table[here as usize] = next;
        }
        k += 1;
    }
    table
}

const fn move_table(mv: Move) -> [u8; CELL_COUNT] {
    match mv {
        Move::RowRight(row) => shift_table(row_cycle(row as usize), true),
        Move::RowLeft(row) => shift_table(row_cycle(row as usize), false),
        Move::ColUp(col) => shift_table(col_cycle(col as usize), false),
        Move::ColDown(col) => shift_table(col_cycle(col as usize), true),
        Move::OuterCw => shift_table(ring_cycle(0), true),
        Move::OuterCcw => shift_table(ring_cycle(0), false),
        Move::InnerCw => shift_table(ring_cycle(1), true),
        Move::InnerCcw => shift_table(ring_cycle(1), false),
    }
}

const fn build_move_tables() -> [[u8; CELL_COUNT]; MOVE_COUNT] {
    let mut tables = [[0u8; CELL_COUNT]; MOVE_COUNT];
    let mut index = 0;
    while index < MOVE_COUNT {
        tables[index] = move_table(Move::from_index(index));
        index += 1;
    }
    tables
}

static MOVE_TABLES: [[u8; CELL_COUNT]; MOVE_COUNT] = build_move_tables();

/// Every board reachable in one move, paired with the move that reaches it.
///
/// Order follows `Move::ALL`.
#[inline]
pub fn successors(board: Board) -> [(Board, Move); MOVE_COUNT] {
    Move::ALL.map(|mv| (board.apply(mv), mv))
}

/// Applies labelled moves in order.
pub fn apply_labels<S: AsRef<str>>(board: Board, labels: &[S]) -> Result<Board, MoveParseError> {
    labels
        .iter()
        .try_fold(board, |board, label| Ok(board.apply(label.as_ref().parse()?)))
}

/// Joins move labels with single spaces.
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.label())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draws `count` random moves, never directly undoing the previous one.
///
/// Applying the result to the goal yields a board that is solvable by
/// construction.
pub fn scramble<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(count);
    while moves.len() < count {
        let candidate = Move::ALL[rng.gen_range(0..MOVE_COUNT)];
        if moves.last().is_some_and(|last| last.inverse() == candidate) {
            continue;
        }
        moves.push(candidate);
    }
    moves
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn sample_boards() -> Vec<Board> {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut boards = vec![Board::GOAL];
        for count in [1, 3, 8, 20, 50] {
            boards.push(Board::GOAL.apply_all(scramble(&mut rng, count)));
        }
        boards
    }

    fn is_permutation(board: &Board) -> bool {
        let mut seen = [false; CELL_COUNT];
        for &value in board.cells() {
            if !(1..=CELL_COUNT).contains(&(value as usize)) || seen[value as usize - 1] {
                return false;
            }
            seen[value as usize - 1] = true;
        }
        true
    }

    #[test]
    fn test_index_matches_all_order() {
        for (index, mv) in Move::ALL.iter().enumerate() {
            assert_eq!(mv.index(), index, "{mv:?} is out of order");
        }
    }

    #[test]
    fn test_labels_are_distinct_and_parse() {
        let labels: HashSet<&str> = Move::ALL.iter().map(|mv| mv.label()).collect();
        assert_eq!(labels.len(), MOVE_COUNT);

        for mv in Move::ALL {
            assert_eq!(mv.to_string().parse::<Move>(), Ok(mv));
        }
        assert_eq!("R3".parse::<Move>(), Ok(Move::RowRight(2)));
        assert_eq!("D5".parse::<Move>(), Ok(Move::ColDown(4)));
        assert_eq!("Icc".parse::<Move>(), Ok(Move::InnerCcw));
    }

    #[test]
    fn test_unknown_labels_rejected() {
        for label in ["", "R0", "R6", "r1", "OC", "Oc ", "X"] {
            assert_eq!(
                label.parse::<Move>(),
                Err(MoveParseError(label.to_owned())),
                "{label:?} should not parse"
            );
        }
    }

    #[test]
    #[should_panic(expected = "row index out of range")]
    fn test_row_index_checked() {
        let _ = Move::RowRight(5).index();
    }

    #[test]
    fn test_inverse_laws() {
        for board in sample_boards() {
            for mv in Move::ALL {
                assert_eq!(
                    board.apply(mv).apply(mv.inverse()),
                    board,
                    "{mv} followed by {} is not the identity",
                    mv.inverse()
                );
                assert_eq!(mv.inverse().inverse(), mv);
            }
        }
    }

    #[test]
    fn test_cycle_lengths_restore_board() {
        // a row or column returns after 5 steps, the rings after 16 and 8
        for board in sample_boards() {
            for (mv, period) in [
                (Move::RowRight(1), 5),
                (Move::ColUp(3), 5),
                (Move::OuterCw, 16),
                (Move::InnerCcw, 8),
            ] {
                let cycled = board.apply_all(std::iter::repeat(mv).take(period));
                assert_eq!(cycled, board, "{mv} does not have period {period}");
                let short = board.apply_all(std::iter::repeat(mv).take(period - 1));
                assert_ne!(short, board);
            }
        }
    }

    #[test]
    fn test_successors_are_complete() {
        for board in sample_boards() {
            let next = successors(board);
            assert_eq!(next.len(), MOVE_COUNT);

            let labels: HashSet<&str> = next.iter().map(|(_, mv)| mv.label()).collect();
            assert_eq!(labels.len(), MOVE_COUNT);

            let boards: HashSet<Board> = next.iter().map(|(child, _)| *child).collect();
            assert_eq!(boards.len(), MOVE_COUNT, "two moves produced the same board");

            for (child, mv) in next {
                assert!(is_permutation(&child), "{mv} broke the permutation");
                assert_ne!(child, board);
                assert_eq!(child, board.apply(mv));
            }
        }
    }

    #[test]
    fn test_row_shifts() {
        let right = Board::GOAL.apply(Move::RowRight(0));
        assert_eq!(&right.cells()[..5], &[5, 1, 2, 3, 4]);
        assert_eq!(&right.cells()[5..], &Board::GOAL.cells()[5..]);

        let left = Board::GOAL.apply(Move::RowLeft(4));
        assert_eq!(&left.cells()[20..], &[22, 23, 24, 25, 21]);
    }

    #[test]
    fn test_column_shifts() {
        let up = Board::GOAL.apply(Move::ColUp(0));
        let column: Vec<u8> = (0..5).map(|row| up.cell(row, 0)).collect();
        assert_eq!(column, [6, 11, 16, 21, 1]);

        let down = Board::GOAL.apply(Move::ColDown(2));
        let column: Vec<u8> = (0..5).map(|row| down.cell(row, 2)).collect();
        assert_eq!(column, [23, 3, 8, 13, 18]);
        assert_eq!(down.cell(0, 1), 2);
    }

    #[test]
    fn test_outer_clockwise() {
        let rotated = Board::GOAL.apply(Move::OuterCw);
        let expected = Board::try_from([
            [6, 1, 2, 3, 4],
            [11, 7, 8, 9, 5],
            [16, 12, 13, 14, 10],
            [21, 17, 18, 19, 15],
            [22, 23, 24, 25, 20],
        ])
        .unwrap();
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_outer_counter_clockwise() {
        let rotated = Board::GOAL.apply(Move::OuterCcw);
        let expected = Board::try_from([
            [2, 3, 4, 5, 10],
            [1, 7, 8, 9, 15],
            [6, 12, 13, 14, 20],
            [11, 17, 18, 19, 25],
            [16, 21, 22, 23, 24],
        ])
        .unwrap();
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_inner_clockwise() {
        let rotated = Board::GOAL.apply(Move::InnerCw);
        let expected = Board::try_from([
            [1, 2, 3, 4, 5],
            [6, 12, 7, 8, 10],
            [11, 17, 13, 9, 15],
            [16, 18, 19, 14, 20],
            [21, 22, 23, 24, 25],
        ])
        .unwrap();
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_apply_labels() {
        let board = apply_labels(Board::GOAL, &["R2", "D3", "Ic", "L5"]).unwrap();
        let expected = Board::GOAL.apply_all([
            Move::RowRight(1),
            Move::ColDown(2),
            Move::InnerCw,
            Move::RowLeft(4),
        ]);
        assert_eq!(board, expected);

        assert_eq!(
            apply_labels(Board::GOAL, &["R2", "Z9"]),
            Err(MoveParseError("Z9".to_owned()))
        );
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&[]), "");
        assert_eq!(
            format_moves(&[Move::OuterCcw, Move::ColUp(0), Move::RowLeft(4)]),
            "Occ U1 L5"
        );
    }

    #[test]
    fn test_scramble_never_backtracks() {
        let mut rng = StdRng::seed_from_u64(7);
        let moves = scramble(&mut rng, 200);
        assert_eq!(moves.len(), 200);
        for pair in moves.windows(2) {
            assert_ne!(pair[1], pair[0].inverse(), "scramble undid {}", pair[0]);
        }
    }
}
