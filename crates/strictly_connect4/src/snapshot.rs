//! Authoritative game snapshots as read from the ledger.

use crate::{Board, Cell};
use serde::{Deserialize, Serialize};

/// Ledger-assigned game number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display, derive_more::From, derive_more::FromStr,
)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    /// Wraps a raw game number.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw game number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Account address on the ledger.
///
/// Addresses compare case-insensitively: the ledger returns checksummed
/// mixed-case hex while wallets often report lowercase.
#[derive(Debug, Clone, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The all-zero address the ledger uses for "nobody".
    pub const ZERO_HEX: &'static str = "0x0000000000000000000000000000000000000000";

    /// Wraps an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The zero sentinel.
    pub fn zero() -> Self {
        Self(Self::ZERO_HEX.to_string())
    }

    /// True for the zero sentinel or an empty string.
    pub fn is_zero(&self) -> bool {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        digits.chars().all(|c| c == '0')
    }

    /// The address as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        match (self.0.get(..6), self.0.get(38..)) {
            (Some(head), Some(tail)) if self.0.len() > 10 => format!("{}...{}", head, tail),
            _ => self.0.clone(),
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One full read of a game's authoritative state.
///
/// Immutable once built; the next fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Game number.
    pub game_id: GameId,
    /// Creator of the game.
    pub player1: Address,
    /// Joining player, zero while waiting for an opponent.
    pub player2: Address,
    /// Account due to move.
    pub current_player: Address,
    /// Winner, zero when there is none.
    pub winner: Address,
    /// Board contents.
    pub board: Board,
    /// False once the game is won, drawn or timed out.
    pub is_active: bool,
    /// Ledger time of the last move, in seconds.
    pub last_move_timestamp: i64,
    /// Seconds a player may take before the opponent can claim a timeout.
    pub timeout_duration: i64,
}

impl GameSnapshot {
    /// True when the snapshot shows a finished game.
    pub fn is_terminal(&self) -> bool {
        !self.is_active
    }

    /// Winner, or `None` for the zero sentinel.
    pub fn winner(&self) -> Option<&Address> {
        (!self.winner.is_zero()).then_some(&self.winner)
    }

    /// True once a second player has joined.
    pub fn has_opponent(&self) -> bool {
        !self.player2.is_zero()
    }

    /// Piece colour belonging to `address`, if it is seated in this game.
    pub fn cell_for(&self, address: &Address) -> Option<Cell> {
        if address.is_zero() {
            None
        } else if *address == self.player1 {
            Some(Cell::Player1)
        } else if *address == self.player2 {
            Some(Cell::Player2)
        } else {
            None
        }
    }
}
