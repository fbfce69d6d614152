//! Optimistic local pre-check for outgoing moves.
//!
//! The ledger stays the only authority on legality. This gate only filters
//! moves that are certain to be refused so they never cost a round trip.

use crate::{Address, Cell, Column, GameSnapshot, MoveRejection};
use tracing::{debug, instrument};

/// Decides whether a move in `column` by `local` is worth submitting.
///
/// Checks, in order: the game is active, the snapshot's current player is
/// `local` (compared case-insensitively), and the column's top cell is empty.
#[instrument(skip(snapshot), fields(game_id = %snapshot.game_id))]
pub fn can_move(
    snapshot: &GameSnapshot,
    local: &Address,
    column: Column,
) -> Result<(), MoveRejection> {
    if !snapshot.is_active {
        debug!("Game not active");
        return Err(MoveRejection::NotActive);
    }
    if snapshot.current_player != *local {
        debug!(current = %snapshot.current_player, "Not local player's turn");
        return Err(MoveRejection::NotYourTurn);
    }
    if snapshot.board.cells()[column.top_index()] != Cell::Empty {
        debug!("Column full");
        return Err(MoveRejection::ColumnFull(column));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, GameId, index_of};

    const ALICE: &str = "0xA11CE00000000000000000000000000000000001";
    const BOB: &str = "0xB0B0000000000000000000000000000000000002";

    fn snapshot(board: Board) -> GameSnapshot {
        GameSnapshot {
            game_id: GameId::new(1),
            player1: Address::new(ALICE),
            player2: Address::new(BOB),
            current_player: Address::new(ALICE),
            winner: Address::zero(),
            board,
            is_active: true,
            last_move_timestamp: 1000,
            timeout_duration: 60,
        }
    }

    fn col(n: usize) -> Column {
        Column::new(n).unwrap()
    }

    #[test]
    fn test_accepts_legal_move() {
        let snap = snapshot(Board::new());
        assert_eq!(can_move(&snap, &Address::new(ALICE), col(3)), Ok(()));
    }

    #[test]
    fn test_accepts_lowercase_local_address() {
        let snap = snapshot(Board::new());
        let local = Address::new(ALICE.to_lowercase());
        assert_eq!(can_move(&snap, &local, col(0)), Ok(()));
    }

    #[test]
    fn test_rejects_inactive_game_first() {
        let mut snap = snapshot(Board::new());
        snap.is_active = false;
        snap.current_player = Address::new(BOB);
        assert_eq!(
            can_move(&snap, &Address::new(ALICE), col(0)),
            Err(MoveRejection::NotActive)
        );
    }

    #[test]
    fn test_rejects_other_players_turn() {
        let mut snap = snapshot(Board::new());
        snap.current_player = Address::new(BOB);
        assert_eq!(
            can_move(&snap, &Address::new(ALICE), col(0)),
            Err(MoveRejection::NotYourTurn)
        );
    }

    #[test]
    fn test_rejects_full_column_by_top_cell_only() {
        // Only the top cell is set; lower rows are irrelevant to the check.
        let board = Board::with_pieces([(index_of(5, 2).unwrap(), Cell::Player2)]).unwrap();
        let snap = snapshot(board);
        assert_eq!(
            can_move(&snap, &Address::new(ALICE), col(2)),
            Err(MoveRejection::ColumnFull(col(2)))
        );
        assert_eq!(can_move(&snap, &Address::new(ALICE), col(1)), Ok(()));
    }
}
