//! Winning-line detection for a finished board.

use crate::{Board, Cell, HEIGHT, WIDTH};
use tracing::instrument;

/// Four flat indices forming a line, in scan order.
pub type WinningLine = [usize; 4];

/// Line orientations in the order they are scanned.
///
/// Each entry is `(rows, cols, step)`: the starting cells to try and the
/// flat-index stride between consecutive cells of the line.
const ORIENTATIONS: [(std::ops::Range<usize>, std::ops::Range<usize>, isize); 4] = [
    // Horizontal
    (0..HEIGHT, 0..WIDTH - 3, 1),
    // Vertical
    (0..HEIGHT - 3, 0..WIDTH, WIDTH as isize),
    // Diagonal, bottom-left to top-right
    (0..HEIGHT - 3, 0..WIDTH - 3, WIDTH as isize + 1),
    // Diagonal, top-left to bottom-right
    (3..HEIGHT, 0..WIDTH - 3, -(WIDTH as isize - 1)),
];

/// Finds the first four-in-a-line of one player's pieces.
///
/// Orientations are tried horizontal, vertical, ascending diagonal, then
/// descending diagonal; within each, start cells are visited row by row.
/// The first hit wins. `None` is the normal answer for a draw or a game
/// decided by timeout.
#[instrument(skip(board), fields(pieces = board.piece_count()))]
pub fn scan(board: &Board) -> Option<WinningLine> {
    let cells = board.cells();
    for (rows, cols, step) in ORIENTATIONS {
        for row in rows {
            for col in cols.clone() {
                let start = row * WIDTH + col;
                let line = [0, 1, 2, 3].map(|k| start.wrapping_add_signed(step * k));
                let first = cells[line[0]];
                if first != Cell::Empty && line[1..].iter().all(|i| cells[*i] == first) {
                    return Some(line);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(indices: &[usize], cell: Cell) -> Board {
        Board::with_pieces(indices.iter().map(|i| (*i, cell))).unwrap()
    }

    #[test]
    fn test_no_line_on_empty_board() {
        assert_eq!(scan(&Board::new()), None);
    }

    #[test]
    fn test_horizontal_line() {
        let board = board_with(&[14, 15, 16, 17], Cell::Player1);
        assert_eq!(scan(&board), Some([14, 15, 16, 17]));
    }

    #[test]
    fn test_vertical_line() {
        let board = board_with(&[3, 10, 17, 24], Cell::Player2);
        assert_eq!(scan(&board), Some([3, 10, 17, 24]));
    }

    #[test]
    fn test_ascending_diagonal() {
        let board = board_with(&[0, 8, 16, 24], Cell::Player1);
        assert_eq!(scan(&board), Some([0, 8, 16, 24]));
    }

    #[test]
    fn test_descending_diagonal() {
        // Row 3 col 0 down to row 0 col 3.
        let board = board_with(&[21, 15, 9, 3], Cell::Player2);
        assert_eq!(scan(&board), Some([21, 15, 9, 3]));
    }

    #[test]
    fn test_mixed_colours_are_not_a_line() {
        let mut board = board_with(&[0, 1, 2], Cell::Player1);
        board.set(3, Cell::Player2).unwrap();
        assert_eq!(scan(&board), None);
    }

    #[test]
    fn test_three_in_a_row_is_not_a_line() {
        let board = board_with(&[0, 7, 14], Cell::Player1);
        assert_eq!(scan(&board), None);
    }

    #[test]
    fn test_lines_do_not_wrap_across_rows() {
        // Cols 5, 6 of row 0 then cols 0, 1 of row 1.
        let board = board_with(&[5, 6, 7, 8], Cell::Player1);
        assert_eq!(scan(&board), None);
    }

    #[test]
    fn test_horizontal_takes_priority_over_vertical() {
        let mut board = board_with(&[3, 10, 17, 24], Cell::Player2);
        for i in [28, 29, 30, 31] {
            board.set(i, Cell::Player1).unwrap();
        }
        for _ in 0..3 {
            assert_eq!(scan(&board), Some([28, 29, 30, 31]));
        }
    }

    #[test]
    fn test_vertical_takes_priority_over_diagonals() {
        let mut board = board_with(&[6, 13, 20, 27], Cell::Player1);
        for i in [0, 8, 16, 24] {
            board.set(i, Cell::Player2).unwrap();
        }
        assert_eq!(scan(&board), Some([6, 13, 20, 27]));
    }

    #[test]
    fn test_full_drawn_board_has_no_line() {
        // Column pairs alternate colour in blocks so no four line up.
        let pattern = [
            [1, 1, 2, 2, 1, 1, 2],
            [2, 2, 1, 1, 2, 2, 1],
            [1, 1, 2, 2, 1, 1, 2],
            [2, 2, 1, 1, 2, 2, 1],
            [1, 1, 2, 2, 1, 1, 2],
            [2, 2, 1, 1, 2, 2, 1],
        ];
        let codes: Vec<u8> = pattern.iter().flatten().copied().collect();
        let board = Board::from_codes(&codes).unwrap();
        assert_eq!(board.piece_count(), 42);
        assert_eq!(scan(&board), None);
    }
}
