//! Move-deadline arithmetic.
//!
//! All inputs are explicit, including `now`, so the countdown can be
//! recomputed on every fetch and every local tick without reading a clock.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating the move deadline at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeoutStatus {
    /// Whole seconds until the deadline, never negative.
    pub remaining: i64,
    /// True once the deadline has passed and a timeout may be claimed.
    pub available: bool,
}

impl TimeoutStatus {
    /// Status once the deadline has passed.
    pub const EXPIRED: Self = Self {
        remaining: 0,
        available: true,
    };
}

/// Evaluates `deadline = last_move_timestamp + timeout_duration` against `now`.
#[instrument]
pub fn evaluate(last_move_timestamp: i64, timeout_duration: i64, now: i64) -> TimeoutStatus {
    let deadline = last_move_timestamp.saturating_add(timeout_duration);
    TimeoutStatus {
        remaining: deadline.saturating_sub(now).max(0),
        available: deadline <= now,
    }
}

/// Re-evaluates a status for a local tick.
///
/// `previous` is the status last published for the same
/// `last_move_timestamp`. Once it was available it stays available, so a
/// clock that steps backwards cannot hide an already-claimable timeout.
#[instrument]
pub fn reevaluate(
    previous: TimeoutStatus,
    last_move_timestamp: i64,
    timeout_duration: i64,
    now: i64,
) -> TimeoutStatus {
    if previous.available {
        return TimeoutStatus::EXPIRED;
    }
    evaluate(last_move_timestamp, timeout_duration, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_before_deadline() {
        let status = evaluate(1000, 60, 1059);
        assert!(!status.available);
        assert_eq!(status.remaining, 1);
    }

    #[test]
    fn test_at_deadline() {
        let status = evaluate(1000, 60, 1060);
        assert!(status.available);
        assert_eq!(status.remaining, 0);
    }

    #[test]
    fn test_long_after_deadline_never_negative() {
        let status = evaluate(1000, 60, 2000);
        assert!(status.available);
        assert_eq!(status.remaining, 0);
    }

    #[test]
    fn test_clock_behind_ledger() {
        let status = evaluate(1000, 60, 900);
        assert!(!status.available);
        assert_eq!(status.remaining, 160);
    }

    #[test]
    fn test_reevaluate_latches_expiry() {
        let expired = evaluate(1000, 60, 1060);
        // Local clock stepped backwards.
        assert_eq!(reevaluate(expired, 1000, 60, 1030), TimeoutStatus::EXPIRED);
    }

    #[test]
    fn test_reevaluate_counts_down() {
        let start = evaluate(1000, 60, 1010);
        assert_eq!(start.remaining, 50);
        assert_eq!(reevaluate(start, 1000, 60, 1011).remaining, 49);
    }
}
