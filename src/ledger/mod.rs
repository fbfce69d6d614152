//! Seams to the ledger that holds authoritative game state.
//!
//! Reads are request/response snapshots; there are no push notifications.
//! Writes return only once the change is recorded, or fail.

mod http;

pub use http::{GameStateResponse, HttpLedgerClient};

use crate::LedgerError;
use async_trait::async_trait;
use strictly_connect4::{Column, GameId, GameSnapshot};

/// Read-only access to ledger state.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Full state of one game.
    async fn get_game_state(&self, game_id: GameId) -> Result<GameSnapshot, LedgerError>;

    /// Human-readable summary of one game.
    async fn get_game_info(&self, game_id: GameId) -> Result<String, LedgerError>;

    /// Games waiting for a second player.
    async fn get_available_games(&self) -> Result<Vec<GameId>, LedgerError>;
}

/// State-changing ledger calls made on behalf of the local account.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Opens a new game with the given move allowance in seconds.
    async fn create_game(&self, timeout_secs: i64) -> Result<GameId, LedgerError>;

    /// Takes the second seat of a waiting game.
    async fn join_game(&self, game_id: GameId) -> Result<(), LedgerError>;

    /// Joins any waiting game, or opens a new one.
    async fn auto_matchmaking(&self, timeout_secs: i64) -> Result<GameId, LedgerError>;

    /// Drops a piece into `column`.
    async fn make_move(&self, game_id: GameId, column: Column) -> Result<(), LedgerError>;

    /// Claims the win after the opponent's deadline passed.
    async fn check_timeout(&self, game_id: GameId) -> Result<(), LedgerError>;

    /// Settles every game whose deadline passed without a claim.
    async fn cleanup_timed_out_games(&self) -> Result<(), LedgerError>;
}
