//! Pure reconciliation rules for Connect Four snapshots.
//!
//! Each rule takes explicit snapshots (and, for the clock, an explicit
//! `now`) and returns a new value. None of them hold state or perform I/O,
//! so the synchronizer can rerun them on every poll and every tick.

pub mod diff;
pub mod gate;
pub mod timeout;
pub mod win;

pub use diff::{PlacedPiece, diff};
pub use gate::can_move;
pub use timeout::{TimeoutStatus, evaluate, reevaluate};
pub use win::{WinningLine, scan};
