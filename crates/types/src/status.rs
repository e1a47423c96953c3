//! Auction status derivation.

use std::fmt;

/// Derived auction lifecycle status. Never stored; recomputed on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionStatus {
    Active,
    Ended,
    Finalized,
    Cancelled,
}

impl AuctionStatus {
    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "Active",
            AuctionStatus::Ended => "Ended",
            AuctionStatus::Finalized => "Finalized",
            AuctionStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuctionStatus::Active => "active",
            AuctionStatus::Ended => "ended",
            AuctionStatus::Finalized => "finalized",
            AuctionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Derive the status of an auction from chain state at time `now`.
///
/// Precedence is fixed: cancelled, then finalized, then an unknown or zero
/// end time (reported as ended rather than active), then the clock
/// comparison. `now` must be freshly sampled by the caller; the result is
/// not cacheable across ticks.
pub fn auction_status(
    end_time: Option<u64>,
    finalized: Option<bool>,
    cancelled: Option<bool>,
    now: u64,
) -> AuctionStatus {
    if cancelled == Some(true) {
        return AuctionStatus::Cancelled;
    }
    if finalized == Some(true) {
        return AuctionStatus::Finalized;
    }
    match end_time {
        None | Some(0) => AuctionStatus::Ended,
        Some(end) => {
            if now < end {
                AuctionStatus::Active
            } else {
                AuctionStatus::Ended
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;
    const FUTURE: u64 = NOW + 3600;
    const PAST: u64 = NOW - 3600;

    #[test]
    fn running_auction_is_active() {
        assert_eq!(
            auction_status(Some(FUTURE), Some(false), Some(false), NOW),
            AuctionStatus::Active
        );
    }

    #[test]
    fn past_end_time_is_ended() {
        assert_eq!(
            auction_status(Some(PAST), Some(false), Some(false), NOW),
            AuctionStatus::Ended
        );
    }

    #[test]
    fn finalized_wins_over_clock() {
        assert_eq!(
            auction_status(Some(PAST), Some(true), Some(false), NOW),
            AuctionStatus::Finalized
        );
        assert_eq!(
            auction_status(Some(FUTURE), Some(true), Some(false), NOW),
            AuctionStatus::Finalized
        );
    }

    #[test]
    fn cancelled_wins_over_everything() {
        assert_eq!(
            auction_status(Some(FUTURE), Some(true), Some(true), NOW),
            AuctionStatus::Cancelled
        );
        assert_eq!(
            auction_status(None, None, Some(true), NOW),
            AuctionStatus::Cancelled
        );
    }

    #[test]
    fn missing_end_time_is_never_active() {
        assert_eq!(
            auction_status(None, Some(false), Some(false), NOW),
            AuctionStatus::Ended
        );
        assert_eq!(
            auction_status(Some(0), Some(false), Some(false), NOW),
            AuctionStatus::Ended
        );
    }

    #[test]
    fn boundary_instant_counts_as_ended() {
        assert_eq!(
            auction_status(Some(NOW), Some(false), Some(false), NOW),
            AuctionStatus::Ended
        );
    }
}
