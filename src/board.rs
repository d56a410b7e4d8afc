//! Board representation for the 5x5 shift puzzle.
//!
//! A board is a flat row-major array holding each of the values 1 through 25
//! exactly once. Boards are small `Copy` values: every move produces a new
//! board, so the search can hold many of them without aliasing concerns.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::moves::Move;

/// Number of rows and columns.
pub const BOARD_DIM: usize = 5;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_DIM * BOARD_DIM;

/// Reasons a sequence of numbers cannot be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected 25 cells, found {0}")]
    WrongCellCount(usize),
    #[error("invalid cell value {0:?}")]
    InvalidToken(String),
    #[error("cell value {0} is outside 1..=25")]
    OutOfRange(u32),
    #[error("cell value {0} appears more than once")]
    Duplicate(u8),
}

/// Converts (row, col) coordinates to a linear cell index.
#[inline(always)]
pub const fn cell_index(row: usize, col: usize) -> usize {
    row * BOARD_DIM + col
}

/// Converts a linear cell index to (row, col) coordinates.
#[inline(always)]
pub const fn cell_coord(index: usize) -> (usize, usize) {
    (index / BOARD_DIM, index % BOARD_DIM)
}

/// A permutation of 1..=25 laid out row-major on a 5x5 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([u8; CELL_COUNT]);

impl Board {
    /// The solved arrangement: 1 through 25 in row-major order.
    pub const GOAL: Board = Board(goal_cells());

    /// Returns true if every cell holds `1 + 5 * row + col`.
    #[inline]
    pub fn is_goal(&self) -> bool {
        *self == Self::GOAL
    }

    /// Value at the given row and column.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.0[cell_index(row, col)]
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.0
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.0.chunks_exact(BOARD_DIM)
    }

    /// Returns the board produced by applying `mv`.
    #[inline]
    pub fn apply(self, mv: Move) -> Board {
        let table = mv.permutation();
        Board(std::array::from_fn(|cell| self.0[table[cell] as usize]))
    }

    /// Applies moves in order and returns the final board.
    pub fn apply_all<I>(self, moves: I) -> Board
    where
        I: IntoIterator<Item = Move>,
    {
        moves.into_iter().fold(self, Board::apply)
    }
}

const fn goal_cells() -> [u8; CELL_COUNT] {
    let mut cells = [0u8; CELL_COUNT];
    let mut i = 0;
    while i < CELL_COUNT {
        cells[i] = i as u8 + 1;
        i += 1;
    }
    cells
}

impl Default for Board {
    fn default() -> Self {
        Self::GOAL
    }
}

impl TryFrom<[u8; CELL_COUNT]> for Board {
    type Error = BoardError;

    fn try_from(cells: [u8; CELL_COUNT]) -> Result<Self, Self::Error> {
        let mut seen = [false; CELL_COUNT];
        for &value in &cells {
            if !(1..=CELL_COUNT as u8).contains(&value) {
                return Err(BoardError::OutOfRange(value.into()));
            }
            let slot = &mut seen[value as usize - 1];
            if *slot {
                return Err(BoardError::Duplicate(value));
            }
            *slot = true;
        }
        Ok(Board(cells))
    }
}

impl TryFrom<[[u8; BOARD_DIM]; BOARD_DIM]> for Board {
    type Error = BoardError;

    fn try_from(rows: [[u8; BOARD_DIM]; BOARD_DIM]) -> Result<Self, Self::Error> {
        let cells = std::array::from_fn(|idx| {
            let (row, col) = cell_coord(idx);
            rows[row][col]
        });
        Board::try_from(cells)
    }
}

impl TryFrom<&[u8]> for Board {
    type Error = BoardError;

    fn try_from(cells: &[u8]) -> Result<Self, Self::Error> {
        let cells: [u8; CELL_COUNT] = cells
            .try_into()
            .map_err(|_| BoardError::WrongCellCount(cells.len()))?;
        Board::try_from(cells)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses 25 whitespace-separated integers in row-major order.
    ///
    /// Line breaks carry no meaning, so both a 5x5 layout and a single line
    /// are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for token in s.split_whitespace() {
            let value = token
                .parse::<u32>()
                .map_err(|_| BoardError::InvalidToken(token.to_owned()))?;
            let value = u8::try_from(value)
                .ok()
                .filter(|v| (1..=CELL_COUNT as u8).contains(v))
                .ok_or(BoardError::OutOfRange(value))?;
            cells.push(value);
        }
        Board::try_from(cells.as_slice())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.rows().enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value:3}")?;
            }
        }
        Ok(())
    }
}
