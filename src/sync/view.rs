//! The immutable view published after every poll and every tick.

use std::sync::Arc;
use strictly_connect4::rules::{self, PlacedPiece, TimeoutStatus, WinningLine};
use strictly_connect4::{Board, GameSnapshot};
use tracing::{debug, instrument};

/// Everything the presentation layer needs about a watched game.
///
/// A pure function of the previous board, the current snapshot and `now`.
/// Each recomputation builds a new value; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Snapshot the view was derived from.
    pub snapshot: Arc<GameSnapshot>,
    /// Cell that became occupied since the previous snapshot.
    pub changed_cell_index: Option<usize>,
    /// Four-in-a-line of a won game, when the board shows one.
    pub winning_line: Option<WinningLine>,
    /// Seconds until a timeout can be claimed.
    pub time_remaining: i64,
    /// Whether a timeout can be claimed now.
    pub timeout_available: bool,
}

impl ViewState {
    /// Deadline status as a single value.
    pub fn timeout(&self) -> TimeoutStatus {
        TimeoutStatus {
            remaining: self.time_remaining,
            available: self.timeout_available,
        }
    }

    /// Column of the changed cell, for highlighting.
    pub fn changed_column(&self) -> Option<usize> {
        self.changed_cell_index.map(|i| i % strictly_connect4::WIDTH)
    }

    /// Rebuilds the view for a local tick at `now`.
    ///
    /// Only the deadline fields move; an already-available timeout stays
    /// available because the snapshot (and its last move time) is unchanged.
    #[instrument(skip(self), fields(game_id = %self.snapshot.game_id))]
    pub fn tick(&self, now: i64) -> ViewState {
        let status = rules::reevaluate(
            self.timeout(),
            self.snapshot.last_move_timestamp,
            self.snapshot.timeout_duration,
            now,
        );
        ViewState {
            time_remaining: status.remaining,
            timeout_available: status.available,
            ..self.clone()
        }
    }
}

/// Outcome of folding a freshly fetched snapshot into the previous view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The new view to publish.
    pub view: ViewState,
    /// Piece detected since the previous snapshot.
    pub new_piece: Option<PlacedPiece>,
    /// True when this snapshot is the first terminal one seen.
    pub became_terminal: bool,
}

/// Derives a new view from the previous one and a fresh snapshot.
///
/// Without a previous view the comparison board is empty, so pieces already
/// on the board at the first fetch are reported as the lowest-index change.
#[instrument(skip_all, fields(game_id = %snapshot.game_id, now = now))]
pub fn reconcile(previous: Option<&ViewState>, snapshot: GameSnapshot, now: i64) -> Reconciliation {
    let empty = Board::new();
    let previous_board = previous.map_or(&empty, |view| &view.snapshot.board);
    let new_piece = rules::diff(previous_board, &snapshot.board);

    let same_move = previous
        .is_some_and(|view| view.snapshot.last_move_timestamp == snapshot.last_move_timestamp);
    let status = match previous {
        Some(view) if same_move => rules::reevaluate(
            view.timeout(),
            snapshot.last_move_timestamp,
            snapshot.timeout_duration,
            now,
        ),
        _ => rules::evaluate(snapshot.last_move_timestamp, snapshot.timeout_duration, now),
    };

    let winning_line = if snapshot.is_terminal() && snapshot.winner().is_some() {
        rules::scan(&snapshot.board)
    } else {
        None
    };

    let became_terminal =
        snapshot.is_terminal() && previous.is_none_or(|view| !view.snapshot.is_terminal());

    debug!(
        ?new_piece,
        ?winning_line,
        remaining = status.remaining,
        available = status.available,
        became_terminal,
        "Reconciled snapshot"
    );

    Reconciliation {
        view: ViewState {
            snapshot: Arc::new(snapshot),
            changed_cell_index: new_piece.map(|p| p.index),
            winning_line,
            time_remaining: status.remaining,
            timeout_available: status.available,
        },
        new_piece,
        became_terminal,
    }
}
