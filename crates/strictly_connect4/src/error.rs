//! Error types for board math and move gating.

use crate::Column;

/// Precondition violation in board coordinate math or board decoding.
///
/// These are programming or data errors, never expected game conditions.
/// Callers abort the operation rather than clamp.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// A row, column or flat index fell outside the board.
    #[display("{} {} out of range (must be < {})", axis, value, bound)]
    IndexOutOfRange {
        /// Which coordinate was rejected ("row", "column" or "index").
        axis: &'static str,
        /// The rejected value.
        value: usize,
        /// Exclusive upper bound for the coordinate.
        bound: usize,
    },

    /// A decoded board did not have exactly 42 cells.
    #[display("Board must have {} cells, got {}", expected, actual)]
    WrongLength {
        /// Required cell count.
        expected: usize,
        /// Cell count received.
        actual: usize,
    },

    /// A decoded cell code was not 0, 1 or 2.
    #[display("Unknown cell code {}", _0)]
    UnknownCell(u8),
}

impl std::error::Error for BoardError {}

impl BoardError {
    pub(crate) fn out_of_range(axis: &'static str, value: usize, bound: usize) -> Self {
        Self::IndexOutOfRange { axis, value, bound }
    }
}

/// Reason the move gate refused to forward a local move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveRejection {
    /// The game is no longer (or not yet) accepting moves.
    #[display("Game is not active")]
    NotActive,

    /// The snapshot says another account is due to move.
    #[display("It's not your turn")]
    NotYourTurn,

    /// The top cell of the column is occupied.
    #[display("Column {} is full", _0)]
    ColumnFull(Column),
}

impl std::error::Error for MoveRejection {}
