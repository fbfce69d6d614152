//! Notifications raised by the synchronizer.

use crate::SyncError;
use strictly_connect4::rules::WinningLine;
use strictly_connect4::{Address, GameId};

/// Messages sent from the synchronizer to presentation.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A piece appeared since the previous snapshot. Raised once per piece.
    NewPiece {
        /// Watched game.
        game_id: GameId,
        /// Flat index of the new piece.
        index: usize,
        /// Column to highlight.
        column: usize,
    },

    /// The game reached a terminal state. Raised once per watch.
    Terminal {
        /// Watched game.
        game_id: GameId,
        /// Line to highlight, `None` for a draw or a timeout win.
        winning_line: Option<WinningLine>,
        /// Winner, `None` for a draw.
        winner: Option<Address>,
    },

    /// A scheduled fetch failed; the previous view is still current.
    FetchFailed(SyncError),
}
