//! Board representation and coordinate math.
//!
//! The board is 7 columns by 6 rows, flattened row-major with row 0 at the
//! bottom. Pieces stack upward from row 0, so a column's occupied cells are
//! always contiguous from the bottom. The remote source guarantees that;
//! nothing here enforces it.

use crate::BoardError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of columns.
pub const WIDTH: usize = 7;
/// Number of rows.
pub const HEIGHT: usize = 6;
/// Number of cells on the board.
pub const CELLS: usize = WIDTH * HEIGHT;

/// Flat index of the cell at `(row, col)`.
#[instrument]
pub fn index_of(row: usize, col: usize) -> Result<usize, BoardError> {
    if row >= HEIGHT {
        return Err(BoardError::out_of_range("row", row, HEIGHT));
    }
    if col >= WIDTH {
        return Err(BoardError::out_of_range("column", col, WIDTH));
    }
    Ok(row * WIDTH + col)
}

/// Column of a flat index.
#[instrument]
pub fn column_of(index: usize) -> Result<usize, BoardError> {
    check_index(index)?;
    Ok(index % WIDTH)
}

/// Row of a flat index (0 is the bottom row).
#[instrument]
pub fn row_of(index: usize) -> Result<usize, BoardError> {
    check_index(index)?;
    Ok(index / WIDTH)
}

fn check_index(index: usize) -> Result<(), BoardError> {
    if index >= CELLS {
        Err(BoardError::out_of_range("index", index, CELLS))
    } else {
        Ok(())
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    /// No piece.
    #[default]
    Empty,
    /// Piece dropped by the game creator.
    Player1,
    /// Piece dropped by the joining player.
    Player2,
}

impl Cell {
    /// Decodes the ledger's numeric cell code.
    pub fn from_code(code: u8) -> Result<Self, BoardError> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Player1),
            2 => Ok(Cell::Player2),
            other => Err(BoardError::UnknownCell(other)),
        }
    }

    /// The ledger's numeric cell code.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Player1 => 1,
            Cell::Player2 => 2,
        }
    }

    /// True unless the cell is empty.
    pub fn is_occupied(self) -> bool {
        self != Cell::Empty
    }
}

impl TryFrom<u8> for Cell {
    type Error = BoardError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

/// A validated column number in `0..7`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "usize", into = "usize")]
pub struct Column(usize);

impl Column {
    /// Validates a column number.
    #[instrument]
    pub fn new(col: usize) -> Result<Self, BoardError> {
        if col >= WIDTH {
            return Err(BoardError::out_of_range("column", col, WIDTH));
        }
        Ok(Self(col))
    }

    /// The raw column number.
    pub fn get(self) -> usize {
        self.0
    }

    /// Flat index of this column's top cell (row 5).
    pub fn top_index(self) -> usize {
        (HEIGHT - 1) * WIDTH + self.0
    }
}

impl TryFrom<usize> for Column {
    type Error = BoardError;

    fn try_from(col: usize) -> Result<Self, Self::Error> {
        Self::new(col)
    }
}

impl From<Column> for usize {
    fn from(col: Column) -> Self {
        col.0
    }
}

/// 7x6 Connect Four board, row-major from the bottom row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    /// Decodes a board from the ledger's cell codes.
    #[instrument(skip(codes), fields(len = codes.len()))]
    pub fn from_codes(codes: &[u8]) -> Result<Self, BoardError> {
        if codes.len() != CELLS {
            return Err(BoardError::WrongLength {
                expected: CELLS,
                actual: codes.len(),
            });
        }
        let mut board = Self::new();
        for (slot, code) in board.cells.iter_mut().zip(codes) {
            *slot = Cell::from_code(*code)?;
        }
        Ok(board)
    }

    /// Places `pieces` on an empty board.
    ///
    /// Fails on the first index outside the board.
    pub fn with_pieces(
        pieces: impl IntoIterator<Item = (usize, Cell)>,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for (index, cell) in pieces {
            board.set(index, cell)?;
        }
        Ok(board)
    }

    /// Returns the cell at a flat index.
    pub fn get(&self, index: usize) -> Result<Cell, BoardError> {
        check_index(index)?;
        Ok(self.cells[index])
    }

    /// Returns the cell at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        Ok(self.cells[index_of(row, col)?])
    }

    /// Places a cell value at a flat index.
    pub fn set(&mut self, index: usize, cell: Cell) -> Result<(), BoardError> {
        check_index(index)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Returns all cells in index order.
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// Number of occupied cells.
    #[instrument(skip(self))]
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Number of cells held by `player`.
    #[instrument(skip(self))]
    pub fn count_for_player(&self, player: Cell) -> usize {
        self.cells.iter().filter(|c| **c == player).count()
    }

    /// Formats the board as text, top row first.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in (0..HEIGHT).rev() {
            for col in 0..WIDTH {
                let symbol = match self.cells[row * WIDTH + col] {
                    Cell::Empty => '.',
                    Cell::Player1 => 'X',
                    Cell::Player2 => 'O',
                };
                result.push(symbol);
                if col < WIDTH - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("0 1 2 3 4 5 6");
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<u8>> for Board {
    type Error = BoardError;

    fn try_from(codes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_codes(&codes)
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|c| c.code()).collect()
    }
}
