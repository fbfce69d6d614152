//! Outgoing ledger actions, gated locally before they are sent.

use crate::config::MIN_TIMEOUT_SECS;
use crate::ledger::{LedgerReader, LedgerWriter};
use crate::sync::ViewState;
use crate::SyncError;
use derive_new::new;
use std::sync::Arc;
use strictly_connect4::dashboard::format_game_info;
use strictly_connect4::rules::can_move;
use strictly_connect4::{Address, Column, GameId, GameSnapshot};
use tracing::{debug, error, info, instrument, warn};

/// Sends actions for the local account, refusing ones that cannot succeed.
#[derive(Debug, new)]
pub struct ActionDispatcher<L: ?Sized> {
    ledger: Arc<L>,
    local: Address,
}

impl<L> ActionDispatcher<L>
where
    L: LedgerReader + LedgerWriter + ?Sized,
{
    /// The local account.
    pub fn local(&self) -> &Address {
        &self.local
    }

    /// Drops a piece into `column` of the viewed game.
    ///
    /// The move gate runs first; a vetoed move is never sent.
    #[instrument(skip(self, view), fields(game_id = %view.snapshot.game_id))]
    pub async fn submit_move(&self, view: &ViewState, column: Column) -> Result<(), SyncError> {
        if let Err(rejection) = can_move(&view.snapshot, &self.local, column) {
            info!(%rejection, "Move vetoed locally");
            return Err(SyncError::MoveRejectedLocally(rejection));
        }
        info!("Submitting move");
        self.ledger
            .make_move(view.snapshot.game_id, column)
            .await
            .map_err(|e| {
                error!(error = %e, "Move rejected by ledger");
                SyncError::MoveRejectedRemotely(e)
            })
    }

    /// Claims a win by timeout once the viewed deadline has passed.
    #[instrument(skip(self, view), fields(game_id = %view.snapshot.game_id))]
    pub async fn claim_timeout(&self, view: &ViewState) -> Result<(), SyncError> {
        if !view.timeout_available {
            debug!(remaining = view.time_remaining, "Timeout not yet available");
            return Err(SyncError::TimeoutNotYetAvailable {
                remaining: view.time_remaining,
            });
        }
        info!("Claiming timeout");
        self.ledger
            .check_timeout(view.snapshot.game_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Timeout claim rejected by ledger");
                SyncError::MoveRejectedRemotely(e)
            })
    }

    /// Opens a new game. Allowances under a minute are raised to a minute.
    #[instrument(skip(self))]
    pub async fn create_game(&self, timeout_secs: i64) -> Result<GameId, SyncError> {
        let timeout_secs = clamp_timeout(timeout_secs);
        let game_id = self
            .ledger
            .create_game(timeout_secs)
            .await
            .map_err(SyncError::MoveRejectedRemotely)?;
        info!(%game_id, timeout_secs, "Created game");
        Ok(game_id)
    }

    /// Joins a waiting game, or opens one if none is waiting.
    #[instrument(skip(self))]
    pub async fn auto_matchmaking(&self, timeout_secs: i64) -> Result<GameId, SyncError> {
        let timeout_secs = clamp_timeout(timeout_secs);
        let game_id = self
            .ledger
            .auto_matchmaking(timeout_secs)
            .await
            .map_err(SyncError::MoveRejectedRemotely)?;
        info!(%game_id, "Matched");
        Ok(game_id)
    }

    /// Takes the second seat of `game_id`.
    #[instrument(skip(self))]
    pub async fn join_game(&self, game_id: GameId) -> Result<(), SyncError> {
        self.ledger
            .join_game(game_id)
            .await
            .map_err(SyncError::MoveRejectedRemotely)
    }

    /// Settles every game whose deadline passed unclaimed.
    #[instrument(skip(self))]
    pub async fn cleanup_timed_out_games(&self) -> Result<(), SyncError> {
        self.ledger
            .cleanup_timed_out_games()
            .await
            .map_err(SyncError::MoveRejectedRemotely)
    }

    /// Games waiting for a second player.
    #[instrument(skip(self))]
    pub async fn available_games(&self) -> Result<Vec<GameId>, SyncError> {
        self.ledger.get_available_games().await.map_err(|source| {
            warn!(error = %source, "Failed to load available games");
            SyncError::FetchFailed {
                game_id: None,
                source,
            }
        })
    }

    /// Ledger summary of a game, showing the snapshot's actual timeout.
    #[instrument(skip(self, snapshot), fields(game_id = %snapshot.game_id))]
    pub async fn game_info(&self, snapshot: &GameSnapshot) -> Result<String, SyncError> {
        let info = self
            .ledger
            .get_game_info(snapshot.game_id)
            .await
            .map_err(|source| SyncError::FetchFailed {
                game_id: Some(snapshot.game_id),
                source,
            })?;
        Ok(format_game_info(&info, snapshot.timeout_duration))
    }
}

fn clamp_timeout(timeout_secs: i64) -> i64 {
    if timeout_secs < MIN_TIMEOUT_SECS {
        debug!(requested = timeout_secs, "Raising timeout to minimum");
    }
    timeout_secs.max(MIN_TIMEOUT_SECS)
}
