//! Error types for the reconciliation engine and its collaborators.

use derive_more::{Display, Error};
use strictly_connect4::{BoardError, GameId, MoveRejection};
use tracing::instrument;

/// What kind of collaborator failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LedgerErrorKind {
    /// The request never got a response (connection, timeout, gateway down).
    #[display("transport")]
    Transport,
    /// The ledger refused the call.
    #[display("revert")]
    Revert,
    /// The response could not be turned into a snapshot.
    #[display("decode")]
    Decode,
}

/// Failure reported by a ledger reader or writer.
#[derive(Debug, Clone, Display, Error)]
#[display("Ledger {} error: {} at {}:{}", kind, message, file, line)]
pub struct LedgerError {
    /// Failure category.
    pub kind: LedgerErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LedgerError {
    /// Creates a new ledger error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: LedgerErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Transport, message)
    }

    /// Shorthand for a refused call.
    #[track_caller]
    pub fn revert(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Revert, message)
    }

    /// Shorthand for an undecodable response.
    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Decode, message)
    }
}

impl From<reqwest::Error> for LedgerError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(format!("Invalid response body: {}", err))
        } else {
            Self::transport(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<BoardError> for LedgerError {
    #[track_caller]
    fn from(err: BoardError) -> Self {
        Self::decode(format!("Invalid board: {}", err))
    }
}

/// Errors surfaced by the synchronizer and the action dispatcher.
#[derive(Debug, Clone, Display)]
pub enum SyncError {
    /// A ledger read failed. For a watched game the next poll retries it.
    #[display("Fetch failed: {}", source)]
    FetchFailed {
        /// Game being fetched, `None` for lobby reads.
        game_id: Option<GameId>,
        /// Collaborator failure.
        source: LedgerError,
    },

    /// The move gate refused the move; nothing was sent.
    #[display("Move rejected locally: {}", _0)]
    MoveRejectedLocally(MoveRejection),

    /// The ledger refused or failed an action that was sent.
    #[display("Rejected by ledger: {}", _0)]
    MoveRejectedRemotely(LedgerError),

    /// A timeout claim was attempted before the deadline.
    #[display("Timeout not reached yet, {} seconds remaining", remaining)]
    TimeoutNotYetAvailable {
        /// Seconds until the claim becomes available.
        remaining: i64,
    },

    /// Coordinate math was handed an impossible value.
    #[display("{}", _0)]
    IndexOutOfRange(BoardError),

    /// An action needed a watched game but none is held.
    #[display("No game is being watched")]
    NotWatching,
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::FetchFailed { source, .. } => Some(source),
            SyncError::MoveRejectedLocally(rejection) => Some(rejection),
            SyncError::MoveRejectedRemotely(err) => Some(err),
            SyncError::IndexOutOfRange(err) => Some(err),
            SyncError::TimeoutNotYetAvailable { .. } | SyncError::NotWatching => None,
        }
    }
}

impl SyncError {
    /// True for failures the polling loop retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::FetchFailed { .. })
    }
}

impl From<MoveRejection> for SyncError {
    fn from(rejection: MoveRejection) -> Self {
        SyncError::MoveRejectedLocally(rejection)
    }
}

impl From<BoardError> for SyncError {
    fn from(err: BoardError) -> Self {
        SyncError::IndexOutOfRange(err)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
