//! Detecting the newly dropped piece between two board snapshots.

use crate::{Board, Cell, CELLS, WIDTH};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell that went from empty to occupied between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedPiece {
    /// Flat index of the cell.
    pub index: usize,
    /// What now occupies it.
    pub new_value: Cell,
}

impl PlacedPiece {
    /// Column to highlight for this piece.
    pub fn column(&self) -> usize {
        self.index % WIDTH
    }
}

/// Returns the first cell, in index order, that was empty in `previous` and
/// is occupied in `current`.
///
/// Only one cell is ever reported. When several cells changed at once (a
/// missed poll during rapid play, or a reused game id) the lowest index wins
/// and the rest are ignored.
#[instrument(skip_all)]
pub fn diff(previous: &Board, current: &Board) -> Option<PlacedPiece> {
    let before = previous.cells();
    let after = current.cells();
    (0..CELLS)
        .find(|&i| before[i] == Cell::Empty && after[i] != Cell::Empty)
        .map(|index| PlacedPiece {
            index,
            new_value: after[index],
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boards_have_no_change() {
        let board = Board::with_pieces([(0, Cell::Player1), (7, Cell::Player2)]).unwrap();
        assert_eq!(diff(&board, &board), None);
        assert_eq!(diff(&Board::new(), &Board::new()), None);
    }

    #[test]
    fn test_single_new_piece() {
        let current = Board::with_pieces([(21, Cell::Player1)]).unwrap();
        let placed = diff(&Board::new(), &current).unwrap();
        assert_eq!(
            placed,
            PlacedPiece {
                index: 21,
                new_value: Cell::Player1
            }
        );
        assert_eq!(placed.column(), 0);
    }

    #[test]
    fn test_multiple_changes_report_lowest_index() {
        let current = Board::with_pieces([(30, Cell::Player2), (4, Cell::Player1)]).unwrap();
        assert_eq!(diff(&Board::new(), &current).map(|p| p.index), Some(4));
    }

    #[test]
    fn test_removed_or_recoloured_cells_are_ignored() {
        let previous = Board::with_pieces([(0, Cell::Player1), (1, Cell::Player2)]).unwrap();
        let current = Board::with_pieces([(1, Cell::Player1)]).unwrap();
        assert_eq!(diff(&previous, &current), None);
    }
}
