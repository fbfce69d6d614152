//! Human-facing facts derived from a snapshot and the local account.
//!
//! Every question of the form "is this me?" goes through [`seat_of`], so
//! address comparisons live in one place instead of at each call site.

use crate::{Address, Cell, GameSnapshot};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Remaining seconds below which the countdown is shown as urgent.
pub const URGENT_SECS: i64 = 60;

/// Where the local account sits in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Seat {
    /// The local account created the game.
    #[strum(to_string = "Player 1")]
    Player1,
    /// The local account joined the game.
    #[strum(to_string = "Player 2")]
    Player2,
    /// The local account is only watching.
    #[strum(to_string = "Spectator")]
    Spectator,
}

impl Seat {
    /// Piece colour for this seat, if playing.
    pub fn cell(self) -> Option<Cell> {
        match self {
            Seat::Player1 => Some(Cell::Player1),
            Seat::Player2 => Some(Cell::Player2),
            Seat::Spectator => None,
        }
    }
}

/// Whose move it is, from the local account's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TurnStatus {
    /// The game is over.
    #[strum(to_string = "Game Ended")]
    Ended,
    /// No second player has joined yet.
    #[strum(to_string = "Waiting for Opponent")]
    WaitingForOpponent,
    /// The local account is due to move.
    #[strum(to_string = "Your Turn")]
    YourTurn,
    /// The other account is due to move.
    #[strum(to_string = "Opponent's Turn")]
    OpponentsTurn,
}

/// Result of the game for the local account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Outcome {
    /// Still being played.
    #[strum(to_string = "In Progress")]
    InProgress,
    /// The local account won.
    #[strum(to_string = "You Won!")]
    Won,
    /// Someone else won.
    #[strum(to_string = "You Lost!")]
    Lost,
    /// Finished with no winner.
    #[strum(to_string = "Draw")]
    Draw,
}

/// Seat of `local` in the snapshot's game.
#[instrument(skip(snapshot))]
pub fn seat_of(snapshot: &GameSnapshot, local: &Address) -> Seat {
    match snapshot.cell_for(local) {
        Some(Cell::Player1) => Seat::Player1,
        Some(Cell::Player2) => Seat::Player2,
        _ => Seat::Spectator,
    }
}

/// Turn indicator for `local`.
#[instrument(skip(snapshot))]
pub fn turn_status(snapshot: &GameSnapshot, local: &Address) -> TurnStatus {
    if !snapshot.is_active {
        TurnStatus::Ended
    } else if !snapshot.has_opponent() {
        TurnStatus::WaitingForOpponent
    } else if snapshot.current_player == *local {
        TurnStatus::YourTurn
    } else {
        TurnStatus::OpponentsTurn
    }
}

/// Game result for `local`.
#[instrument(skip(snapshot))]
pub fn outcome(snapshot: &GameSnapshot, local: &Address) -> Outcome {
    if snapshot.is_active {
        return Outcome::InProgress;
    }
    match snapshot.winner() {
        None => Outcome::Draw,
        Some(winner) if winner == local => Outcome::Won,
        Some(_) => Outcome::Lost,
    }
}

/// Formats seconds as `"{minutes}m {seconds}s"`.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Fraction of the move allowance already used, in `[0, 1]`.
pub fn timeout_progress(remaining: i64, duration: i64) -> f64 {
    if duration <= 0 {
        return 1.0;
    }
    (1.0 - remaining as f64 / duration as f64).clamp(0.0, 1.0)
}

/// True when the countdown should be drawn as urgent.
pub fn is_urgent(remaining: i64) -> bool {
    remaining < URGENT_SECS
}

/// Rewrites the `Timeout period: N seconds` fragment of a ledger summary so it
/// shows `timeout_secs`. Text without the fragment is returned unchanged.
#[instrument(skip(info))]
pub fn format_game_info(info: &str, timeout_secs: i64) -> String {
    const PREFIX: &str = "Timeout period: ";
    const SUFFIX: &str = " seconds";

    let mut search_from = 0;
    while let Some(found) = info[search_from..].find(PREFIX) {
        let digits_start = search_from + found + PREFIX.len();
        let rest = &info[digits_start..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with(SUFFIX) {
            return format!("{}{}{}", &info[..digits_start], timeout_secs, &rest[digits..]);
        }
        search_from = digits_start;
    }
    info.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, GameId};

    const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
    const BOB: &str = "0xb0b0000000000000000000000000000000000002";

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            game_id: GameId::new(3),
            player1: Address::new(ALICE),
            player2: Address::new(BOB),
            current_player: Address::new(BOB),
            winner: Address::zero(),
            board: Board::new(),
            is_active: true,
            last_move_timestamp: 0,
            timeout_duration: 60,
        }
    }

    #[test]
    fn test_seats() {
        let snap = snapshot();
        assert_eq!(
            seat_of(&snap, &Address::new("0xA11CE00000000000000000000000000000000001")),
            Seat::Player1
        );
        assert_eq!(seat_of(&snap, &Address::new(BOB)), Seat::Player2);
        assert_eq!(seat_of(&snap, &Address::new("0xc0ffee")), Seat::Spectator);
        assert_eq!(seat_of(&snap, &Address::zero()), Seat::Spectator);
    }

    #[test]
    fn test_turn_status_order() {
        let mut snap = snapshot();
        assert_eq!(turn_status(&snap, &Address::new(BOB)), TurnStatus::YourTurn);
        assert_eq!(turn_status(&snap, &Address::new(ALICE)), TurnStatus::OpponentsTurn);

        snap.player2 = Address::zero();
        assert_eq!(
            turn_status(&snap, &Address::new(ALICE)),
            TurnStatus::WaitingForOpponent
        );

        snap.is_active = false;
        assert_eq!(turn_status(&snap, &Address::new(ALICE)), TurnStatus::Ended);
        assert_eq!(TurnStatus::OpponentsTurn.to_string(), "Opponent's Turn");
    }

    #[test]
    fn test_outcome() {
        let mut snap = snapshot();
        assert_eq!(outcome(&snap, &Address::new(ALICE)), Outcome::InProgress);

        snap.is_active = false;
        assert_eq!(outcome(&snap, &Address::new(ALICE)), Outcome::Draw);

        snap.winner = Address::new(ALICE);
        assert_eq!(outcome(&snap, &Address::new(ALICE)), Outcome::Won);
        assert_eq!(outcome(&snap, &Address::new(BOB)), Outcome::Lost);
    }

    #[test]
    fn test_countdown_and_progress() {
        assert_eq!(format_countdown(125), "2m 5s");
        assert_eq!(format_countdown(0), "0m 0s");
        assert_eq!(format_countdown(-4), "0m 0s");
        assert_eq!(timeout_progress(60, 60), 0.0);
        assert_eq!(timeout_progress(15, 60), 0.75);
        assert_eq!(timeout_progress(0, 0), 1.0);
        assert!(is_urgent(59));
        assert!(!is_urgent(60));
    }

    #[test]
    fn test_format_game_info() {
        let info = "Game 4: Player 1 to move. Timeout period: 300 seconds. Moves: 2";
        assert_eq!(
            format_game_info(info, 90),
            "Game 4: Player 1 to move. Timeout period: 90 seconds. Moves: 2"
        );
        assert_eq!(format_game_info("no timeout here", 90), "no timeout here");
        assert_eq!(
            format_game_info("Timeout period: soon", 90),
            "Timeout period: soon"
        );
    }
}
