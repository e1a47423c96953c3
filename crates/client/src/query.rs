//! Listing and filtering auction state.

use std::str::FromStr;

use tracing::warn;

use bidnox_types::{AuctionStatus, AuctionView};

use crate::contract::AuctionContract;
use crate::error::ClientError;

/// Status filter for auction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuctionFilter {
    /// Everything except cancelled auctions.
    #[default]
    All,
    Active,
    Ended,
    Finalized,
}

impl AuctionFilter {
    fn matches(&self, auction: &AuctionView, now: u64) -> bool {
        match self {
            AuctionFilter::All => !auction.cancelled,
            AuctionFilter::Active => auction.status(now) == AuctionStatus::Active,
            AuctionFilter::Ended => auction.status(now) == AuctionStatus::Ended,
            AuctionFilter::Finalized => auction.status(now) == AuctionStatus::Finalized,
        }
    }
}

impl FromStr for AuctionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AuctionFilter::All),
            "active" => Ok(AuctionFilter::Active),
            "ended" => Ok(AuctionFilter::Ended),
            "finalized" => Ok(AuctionFilter::Finalized),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Result of a listing fetch.
#[derive(Debug, Clone)]
pub struct AuctionList {
    /// Filtered auctions, most recently ending first.
    pub auctions: Vec<AuctionView>,
    /// Total auctions known to the contract, before filtering.
    pub total_count: u64,
}

/// Fetch all auctions and apply `filter` at time `now`.
///
/// Individual fetch failures are logged and skipped so one bad auction
/// does not hide the rest of the listing.
pub async fn fetch_auctions<C: AuctionContract + ?Sized>(
    contract: &C,
    filter: AuctionFilter,
    now: u64,
) -> Result<AuctionList, ClientError> {
    let total_count = contract.get_auction_count().await?;

    let mut auctions = Vec::new();
    for auction_id in 1..=total_count {
        match contract.get_auction(auction_id).await {
            Ok(Some(auction)) => auctions.push(auction),
            Ok(None) => {}
            Err(e) => {
                warn!(auction_id, error = %e, "failed to fetch auction");
            }
        }
    }

    auctions.retain(|a| filter.matches(a, now));
    auctions.sort_by(|a, b| b.end_time.cmp(&a.end_time));

    Ok(AuctionList {
        auctions,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidnox_types::Address;
    use num_bigint::BigUint;

    fn auction(id: u64, end_time: u64, finalized: bool, cancelled: bool) -> AuctionView {
        AuctionView {
            auction_id: id,
            seller: Address::from_hex("0x1").unwrap(),
            asset_id: BigUint::from(id),
            starting_price: BigUint::from(1u8),
            start_time: 0,
            duration: end_time,
            end_time,
            highest_bid: BigUint::from(0u8),
            highest_bidder: None,
            finalized,
            cancelled,
        }
    }

    #[test]
    fn filter_semantics() {
        let now = 1000;
        let active = auction(1, 2000, false, false);
        let ended = auction(2, 500, false, false);
        let finalized = auction(3, 500, true, false);
        let cancelled = auction(4, 2000, false, true);

        assert!(AuctionFilter::All.matches(&active, now));
        assert!(AuctionFilter::All.matches(&ended, now));
        assert!(!AuctionFilter::All.matches(&cancelled, now));

        assert!(AuctionFilter::Active.matches(&active, now));
        assert!(!AuctionFilter::Active.matches(&ended, now));

        assert!(AuctionFilter::Ended.matches(&ended, now));
        assert!(!AuctionFilter::Ended.matches(&finalized, now));

        assert!(AuctionFilter::Finalized.matches(&finalized, now));
    }

    #[test]
    fn filter_parses_from_str() {
        assert_eq!("all".parse::<AuctionFilter>().unwrap(), AuctionFilter::All);
        assert_eq!(
            "active".parse::<AuctionFilter>().unwrap(),
            AuctionFilter::Active
        );
        assert!("bogus".parse::<AuctionFilter>().is_err());
    }
}
