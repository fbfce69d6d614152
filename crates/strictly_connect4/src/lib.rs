//! Pure Connect Four snapshot model.
//!
//! This crate holds everything that can be derived from a game snapshot
//! without talking to the ledger:
//!
//! - **Board**: 7x6 grid, row 0 at the bottom, and coordinate helpers
//! - **Snapshot**: one authoritative read of a game
//! - **Rules**: winning-line scan, board diff, move deadline, move gate
//! - **Dashboard**: seat, turn and outcome facts for the local account
//!
//! # Example
//!
//! ```
//! use strictly_connect4::{Board, Cell, rules};
//!
//! let board = Board::with_pieces([14, 15, 16, 17].map(|i| (i, Cell::Player1)))?;
//! assert_eq!(rules::scan(&board), Some([14, 15, 16, 17]));
//! # Ok::<(), strictly_connect4::BoardError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dashboard;
mod error;
pub mod rules;
mod snapshot;
mod types;

pub use error::{BoardError, MoveRejection};
pub use snapshot::{Address, GameId, GameSnapshot};
pub use types::{Board, CELLS, Cell, Column, HEIGHT, WIDTH, column_of, index_of, row_of};
